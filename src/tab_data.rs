/// Data structures for tab activity tracking
use serde::{Deserialize, Serialize};

pub const MS_PER_MINUTE: i64 = 60 * 1000;

/// A browser tab as reported by `chrome.tabs`
///
/// `id`, `url` and `title` are missing while a tab is still loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub window_id: i32,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

/// Changed properties delivered with `chrome.tabs.onUpdated`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChangeInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ChangeInfo {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

/// Payload of `chrome.tabs.onActivated`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    pub tab_id: i32,
    pub window_id: i32,
}

/// Stored activity for one open tab (`tabInfo` entry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub window_id: i32,
    pub last_accessed: i64,
    pub access_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
}

impl TabRecord {
    /// Milliseconds since the tab was last accessed, never negative
    pub fn inactive_ms(&self, now: i64) -> i64 {
        (now - self.last_accessed).max(0)
    }
}

/// Secondary projection of a `TabRecord` (`tabAnalytics` entry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabAnalytics {
    pub tab_id: i32,
    pub access_count: u32,
    pub last_accessed: i64,
    /// Always 0: active time is not measured.
    pub total_active_time: i64,
    pub is_stale: bool,
}

impl TabAnalytics {
    pub fn derive(record: &TabRecord, now: i64, threshold_ms: i64) -> TabAnalytics {
        TabAnalytics {
            tab_id: record.id,
            access_count: record.access_count,
            last_accessed: record.last_accessed,
            total_active_time: 0,
            is_stale: record.inactive_ms(now) >= threshold_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionReason {
    Stale,
    Inactive,
}

/// A tab proposed for closing; computed on demand, never stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub tab_id: i32,
    pub title: String,
    pub url: String,
    pub last_accessed: i64,
    pub inactivity_minutes: f64,
    pub reason: SuggestionReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
}
