/// Error type shared by the background services
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed value stored under `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Browser API error: {0}")]
    Host(String),

    #[error("Inactivity threshold must be at least 1 minute, got {0}")]
    InvalidThreshold(u32),

    #[error("Tab event dispatcher is closed")]
    DispatcherClosed,
}

impl Error {
    pub fn malformed(key: &str, source: serde_json::Error) -> Self {
        Error::Malformed {
            key: key.to_string(),
            source,
        }
    }

    /// True for failures reported by the browser tab API
    pub fn is_host(&self) -> bool {
        matches!(self, Error::Host(_))
    }
}
