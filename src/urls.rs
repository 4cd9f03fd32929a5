/// URL classification for tracked tabs
use url::Url;

/// Browser-internal schemes; such pages are never tracked or suggested
pub const PRIVILEGED_SCHEMES: [&str; 3] = ["chrome", "chrome-untrusted", "devtools"];

/// Check whether a URL belongs to the browser's own privileged pages
///
/// Examples:
/// - chrome://extensions → true
/// - devtools://devtools/bundled/inspector.html → true
/// - https://www.google.com → false
pub fn is_privileged(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => PRIVILEGED_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Host part shown under a suggestion's title, falling back to the raw URL
pub fn display_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_schemes() {
        assert!(is_privileged("chrome://extensions"));
        assert!(is_privileged("chrome://newtab/"));
        assert!(is_privileged("CHROME://settings"));
        assert!(is_privileged("chrome-untrusted://terminal/"));
        assert!(is_privileged("devtools://devtools/bundled/inspector.html"));
    }

    #[test]
    fn test_regular_pages() {
        assert!(!is_privileged("https://www.google.com"));
        assert!(!is_privileged("http://localhost:3000"));
        assert!(!is_privileged("file:///home/user/notes.txt"));
        assert!(!is_privileged("https://example.com/chrome://fake"));
    }

    #[test]
    fn test_unparseable_urls_are_not_privileged() {
        assert!(!is_privileged(""));
        assert!(!is_privileged("not a url"));
    }

    #[test]
    fn test_display_host() {
        assert_eq!(display_host("https://www.google.com/search?q=rust"), "google.com");
        assert_eq!(display_host("https://docs.rs/serde"), "docs.rs");
        assert_eq!(display_host("http://127.0.0.1:8080/"), "127.0.0.1");
        assert_eq!(display_host("about:blank"), "about:blank");
    }
}
