/// Chrome extension API bindings (through `bridge.js`)
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::{Error, Result};
use crate::host::{Clock, StorageArea, TabHost};
use crate::messages::{Request, Response};
use crate::tab_data::Tab;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(window_id: Option<i32>) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageGet(area: &str, key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(area: &str, key: &str, value: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowId() -> std::result::Result<JsValue, JsValue>;
}

/// Readable message for a rejected promise
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Serialize for JS with plain objects for maps
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| Error::Host(format!("Failed to serialize: {}", e)))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::Host(format!("Failed to parse: {}", e)))
}

fn host_error(e: JsValue) -> Error {
    Error::Host(js_error_message(&e))
}

/// `chrome.tabs`
pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabHost for ChromeTabs {
    async fn query_tabs(&self, window_id: Option<i32>) -> Result<Vec<Tab>> {
        let tabs_js = queryTabs(window_id).await.map_err(host_error)?;
        from_js(tabs_js)
    }

    async fn get_tab(&self, tab_id: i32) -> Result<Tab> {
        let tab_js = getTab(tab_id).await.map_err(host_error)?;
        from_js(tab_js)
    }

    async fn remove_tab(&self, tab_id: i32) -> Result<()> {
        removeTab(tab_id).await.map_err(host_error)
    }
}

/// One `chrome.storage` area
pub struct ChromeStorage {
    area: &'static str,
}

impl ChromeStorage {
    pub fn local() -> Self {
        ChromeStorage { area: "local" }
    }

    pub fn sync() -> Self {
        ChromeStorage { area: "sync" }
    }
}

#[async_trait(?Send)]
impl StorageArea for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let value_js = storageGet(self.area, key)
            .await
            .map_err(|e| Error::Storage(js_error_message(&e)))?;

        if value_js.is_undefined() || value_js.is_null() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let value_js = to_js(&value)?;
        storageSet(self.area, key, value_js)
            .await
            .map_err(|e| Error::Storage(js_error_message(&e)))
    }
}

/// `Date.now()`
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// Send a request to the background service worker and wait for its answer
pub async fn send_request(request: &Request) -> Result<Response> {
    let message = to_js(request)?;
    let response_js = sendMessage(message).await.map_err(host_error)?;
    if response_js.is_undefined() {
        return Err(Error::Host("No response from background".to_string()));
    }
    from_js(response_js)
}

pub async fn current_window_id() -> Result<Option<i32>> {
    let id_js = getCurrentWindowId().await.map_err(host_error)?;
    Ok(id_js.as_f64().map(|id| id as i32))
}
