/// In-memory stand-ins for the browser runtime, used by unit tests
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::host::{Clock, StorageArea, TabHost};
use crate::tab_data::{MS_PER_MINUTE, Tab};

pub const NOW: i64 = 1_698_508_200_000;

pub fn minutes_ago(minutes: i64) -> i64 {
    NOW - minutes * MS_PER_MINUTE
}

pub fn create_test_tab(id: i32, url: &str, title: &str) -> Tab {
    Tab {
        id: Some(id),
        url: Some(url.to_string()),
        title: Some(title.to_string()),
        window_id: 1,
        fav_icon_url: None,
    }
}

/// Yields to the executor once, so concurrent futures can interleave
pub struct YieldNow(bool);

pub fn yield_now() -> YieldNow {
    YieldNow(false)
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Default)]
pub struct MemoryArea {
    values: RefCell<HashMap<String, Value>>,
    fail: Cell<bool>,
    set_calls: Cell<usize>,
}

impl MemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn fail_with_errors(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.get()
    }
}

#[async_trait(?Send)]
impl StorageArea for MemoryArea {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.fail.get() {
            return Err(Error::Storage("quota exceeded".to_string()));
        }
        let value = self.value(key);
        // Suspend between read and write like the real async storage API
        yield_now().await;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        if self.fail.get() {
            return Err(Error::Storage("quota exceeded".to_string()));
        }
        yield_now().await;
        self.set_calls.set(self.set_calls.get() + 1);
        self.insert(key, value);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTabs {
    tabs: RefCell<Vec<Tab>>,
    removed: RefCell<Vec<i32>>,
    refuse_remove: Cell<bool>,
    keep_removed: Cell<bool>,
}

impl FakeTabs {
    pub fn new(tabs: Vec<Tab>) -> Self {
        FakeTabs {
            tabs: RefCell::new(tabs),
            ..Self::default()
        }
    }

    pub fn open(&self, tab: Tab) {
        self.tabs.borrow_mut().push(tab);
    }

    /// Make `remove_tab` fail, as for an already closed tab
    pub fn refuse_remove(&self, refuse: bool) {
        self.refuse_remove.set(refuse);
    }

    /// Keep reporting removed tabs as open
    pub fn keep_removed(&self, keep: bool) {
        self.keep_removed.set(keep);
    }

    pub fn removed(&self) -> Vec<i32> {
        self.removed.borrow().clone()
    }
}

#[async_trait(?Send)]
impl TabHost for FakeTabs {
    async fn query_tabs(&self, window_id: Option<i32>) -> Result<Vec<Tab>> {
        Ok(self
            .tabs
            .borrow()
            .iter()
            .filter(|tab| window_id.is_none_or(|window| tab.window_id == window))
            .cloned()
            .collect())
    }

    async fn get_tab(&self, tab_id: i32) -> Result<Tab> {
        self.tabs
            .borrow()
            .iter()
            .find(|tab| tab.id == Some(tab_id))
            .cloned()
            .ok_or_else(|| Error::Host(format!("No tab with id: {}", tab_id)))
    }

    async fn remove_tab(&self, tab_id: i32) -> Result<()> {
        if self.refuse_remove.get() {
            return Err(Error::Host(format!("No tab with id: {}", tab_id)));
        }
        self.removed.borrow_mut().push(tab_id);
        if !self.keep_removed.get() {
            self.tabs.borrow_mut().retain(|tab| tab.id != Some(tab_id));
        }
        Ok(())
    }
}

pub struct ManualClock(Cell<i64>);

impl ManualClock {
    pub fn at(now: i64) -> Self {
        ManualClock(Cell::new(now))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.0.set(self.0.get() + minutes * MS_PER_MINUTE);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.get()
    }
}
