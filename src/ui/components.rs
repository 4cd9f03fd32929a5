/// Reusable UI components

use yew::prelude::*;
use web_sys::HtmlImageElement;
use patternfly_yew::prelude::*;
use crate::tab_data::Suggestion;
use crate::urls::display_host;

/// Grey globe shown when a tab has no usable favicon
pub const DEFAULT_FAVICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 16 16'%3E%3Ccircle cx='8' cy='8' r='7' fill='none' stroke='%23888' stroke-width='1.5'/%3E%3Cpath d='M1 8h14M8 1c-2.5 2-2.5 12 0 14M8 1c2.5 2 2.5 12 0 14' fill='none' stroke='%23888'/%3E%3C/svg%3E";

/// Image source for a suggestion's icon
pub fn favicon_src(suggestion: &Suggestion) -> String {
    suggestion
        .favicon_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_FAVICON.to_string())
}

/// Human readable time since last access, e.g. "12 minutes ago"
pub fn format_time_since(minutes: f64) -> String {
    fn plural(count: i64, unit: &str) -> String {
        format!("{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
    }

    if minutes < 60.0 {
        plural(minutes.round() as i64, "minute")
    } else if minutes < 60.0 * 24.0 {
        plural((minutes / 60.0).round() as i64, "hour")
    } else {
        plural((minutes / (60.0 * 24.0)).round() as i64, "day")
    }
}

#[derive(Properties, PartialEq)]
pub struct SuggestionItemProps {
    pub suggestion: Suggestion,
    pub inactive_minutes: u32,
    pub on_close: Callback<i32>,
}

#[function_component(SuggestionItem)]
pub fn suggestion_item(props: &SuggestionItemProps) -> Html {
    let suggestion = &props.suggestion;

    let favicon = favicon_src(suggestion);

    // Broken favicon URLs fall back to the built-in icon
    let on_favicon_error = Callback::from(|e: Event| {
        if let Some(img) = e.target_dyn_into::<HtmlImageElement>() {
            if !img.src().starts_with("data:") {
                img.set_src(DEFAULT_FAVICON);
            }
        }
    });

    let on_close = {
        let on_close = props.on_close.clone();
        let tab_id = suggestion.tab_id;
        Callback::from(move |_| on_close.emit(tab_id))
    };

    html! {
        <div class="tab-item">
            <img class="tab-favicon" src={favicon} alt="" onerror={on_favicon_error} />
            <div class="tab-content">
                <h3 class="tab-title">{&suggestion.title}</h3>
                <p class="tab-url" title={suggestion.url.clone()}>{display_host(&suggestion.url)}</p>
                <div class="tab-meta">
                    <span>{format!("Last accessed {}", format_time_since(suggestion.inactivity_minutes))}</span>
                    <span>{" • "}</span>
                    <span>{format!("Inactive tab ({}+ minutes)", props.inactive_minutes)}</span>
                </div>
            </div>
            <Button onclick={on_close} variant={ButtonVariant::Secondary}>
                {"Close"}
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::SuggestionReason;

    fn create_test_suggestion(favicon_url: Option<&str>) -> Suggestion {
        Suggestion {
            tab_id: 1,
            title: "A".to_string(),
            url: "https://a.com".to_string(),
            last_accessed: 0,
            inactivity_minutes: 10.0,
            reason: SuggestionReason::Inactive,
            favicon_url: favicon_url.map(str::to_string),
        }
    }

    #[test]
    fn test_default_favicon_is_inline() {
        // No packaged file to go missing
        assert!(DEFAULT_FAVICON.starts_with("data:image/svg+xml,"));
        assert!(!DEFAULT_FAVICON.contains('<'));
        assert!(!DEFAULT_FAVICON.contains('#'));
    }

    #[test]
    fn test_favicon_src_falls_back_to_default() {
        assert_eq!(favicon_src(&create_test_suggestion(None)), DEFAULT_FAVICON);
        assert_eq!(favicon_src(&create_test_suggestion(Some(""))), DEFAULT_FAVICON);
        assert_eq!(
            favicon_src(&create_test_suggestion(Some("https://a.com/favicon.ico"))),
            "https://a.com/favicon.ico"
        );
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_time_since(0.4), "0 minutes ago");
        assert_eq!(format_time_since(1.2), "1 minute ago");
        assert_eq!(format_time_since(12.6), "13 minutes ago");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_time_since(60.0), "1 hour ago");
        assert_eq!(format_time_since(150.0), "3 hours ago");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_time_since(60.0 * 24.0), "1 day ago");
        assert_eq!(format_time_since(60.0 * 24.0 * 9.4), "9 days ago");
    }
}
