/// Seams between the extension logic and the browser runtime
///
/// The background services only talk to the browser through these traits.
/// `crate::chrome` implements them on top of the `chrome.*` extension APIs.
use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::tab_data::Tab;

/// The browser's tab API
#[async_trait(?Send)]
pub trait TabHost {
    /// List open tabs, optionally restricted to one window
    async fn query_tabs(&self, window_id: Option<i32>) -> Result<Vec<Tab>>;

    async fn get_tab(&self, tab_id: i32) -> Result<Tab>;

    async fn remove_tab(&self, tab_id: i32) -> Result<()>;
}

/// A JSON key-value storage area (`chrome.storage.local` / `chrome.storage.sync`)
#[async_trait(?Send)]
pub trait StorageArea {
    /// `None` when nothing is stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Wall clock in milliseconds since the Unix epoch
pub trait Clock {
    fn now_ms(&self) -> i64;
}
