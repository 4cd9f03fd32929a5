/// Persistent tab activity store on top of `chrome.storage.local`
///
/// Two blobs are kept, each a map from tab id to a record:
/// - `tabInfo`: the authoritative `TabRecord`s
/// - `tabAnalytics`: the `TabAnalytics` projection
///
/// Every read-modify-write of a blob holds that blob's lock, so two
/// overlapping event handlers cannot drop each other's update.
use std::collections::BTreeMap;
use std::rc::Rc;

use futures::lock::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::host::StorageArea;
use crate::tab_data::{TabAnalytics, TabRecord};

pub const TAB_INFO_KEY: &str = "tabInfo";
pub const TAB_ANALYTICS_KEY: &str = "tabAnalytics";

pub type TabRecords = BTreeMap<i32, TabRecord>;
pub type TabAnalyticsMap = BTreeMap<i32, TabAnalytics>;

/// Fields observed on a tab event, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct TabVisit {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub window_id: i32,
    pub favicon_url: Option<String>,
}

pub struct TabStore {
    area: Rc<dyn StorageArea>,
    info_lock: Mutex<()>,
    analytics_lock: Mutex<()>,
}

impl TabStore {
    pub fn new(area: Rc<dyn StorageArea>) -> Self {
        TabStore {
            area,
            info_lock: Mutex::new(()),
            analytics_lock: Mutex::new(()),
        }
    }

    pub async fn records(&self) -> Result<TabRecords> {
        self.load(TAB_INFO_KEY).await
    }

    pub async fn analytics(&self) -> Result<TabAnalyticsMap> {
        self.load(TAB_ANALYTICS_KEY).await
    }

    /// Upsert the record for a visited tab and return what was stored
    pub async fn record_visit(&self, visit: TabVisit, now: i64) -> Result<TabRecord> {
        let _guard = self.info_lock.lock().await;
        let mut records: TabRecords = self.load(TAB_INFO_KEY).await?;

        let access_count = records
            .get(&visit.id)
            .map_or(1, |existing| existing.access_count.saturating_add(1));

        let record = TabRecord {
            id: visit.id,
            url: visit.url,
            title: visit.title,
            window_id: visit.window_id,
            last_accessed: now,
            access_count,
            favicon_url: visit.favicon_url,
        };
        records.insert(record.id, record.clone());

        self.save(TAB_INFO_KEY, &records).await?;
        Ok(record)
    }

    pub async fn save_analytics(&self, analytics: TabAnalytics) -> Result<()> {
        let _guard = self.analytics_lock.lock().await;
        let mut all: TabAnalyticsMap = self.load(TAB_ANALYTICS_KEY).await?;
        all.insert(analytics.tab_id, analytics);
        self.save(TAB_ANALYTICS_KEY, &all).await
    }

    /// Delete both entries for a tab; returns whether a record existed
    pub async fn remove_tab(&self, tab_id: i32) -> Result<bool> {
        // Always take the locks in this order
        let _info = self.info_lock.lock().await;
        let _analytics = self.analytics_lock.lock().await;

        let mut records: TabRecords = self.load(TAB_INFO_KEY).await?;
        let mut analytics: TabAnalyticsMap = self.load(TAB_ANALYTICS_KEY).await?;

        let existed = records.remove(&tab_id).is_some();
        let had_analytics = analytics.remove(&tab_id).is_some();

        if existed {
            self.save(TAB_INFO_KEY, &records).await?;
        }
        if had_analytics {
            self.save(TAB_ANALYTICS_KEY, &analytics).await?;
        }
        Ok(existed)
    }

    async fn load<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.area.get(key).await? {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value).map_err(|e| Error::malformed(key, e)),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::malformed(key, e))?;
        self.area.set(key, value).await
    }
}
