/// Background service worker: wires the services together and receives
/// browser events and popup messages from `background.js`
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::chrome::{ChromeStorage, ChromeTabs, JsClock, from_js, to_js};
use crate::error::Result;
use crate::events::{EventDispatcher, EventSender, TabEvent};
use crate::host::{Clock, StorageArea, TabHost};
use crate::messages::{MessageRouter, Response};
use crate::ranking::SuggestionRanker;
use crate::settings::SettingsStore;
use crate::storage::TabStore;
use crate::tab_data::{ActiveInfo, ChangeInfo, Tab};
use crate::tracker::TabTracker;

/// Services shared by the event pump and the message router
pub struct Services {
    pub tabs: Rc<dyn TabHost>,
    pub tracker: Rc<TabTracker>,
    pub router: Rc<MessageRouter>,
}

impl Services {
    pub fn new(
        tabs: Rc<dyn TabHost>,
        local: Rc<dyn StorageArea>,
        sync: Rc<dyn StorageArea>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let store = Rc::new(TabStore::new(local));
        let settings = Rc::new(SettingsStore::new(sync));
        let tracker = Rc::new(TabTracker::new(
            tabs.clone(),
            store.clone(),
            settings.clone(),
            clock.clone(),
        ));
        let ranker = Rc::new(SuggestionRanker::new(tabs.clone(), store, settings, clock));
        let router = Rc::new(MessageRouter::new(tracker.clone(), ranker));

        Services {
            tabs,
            tracker,
            router,
        }
    }

    /// Dispatcher with the tracker subscribed
    pub fn dispatcher(&self) -> EventDispatcher {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(self.tracker.clone());
        dispatcher
    }
}

/// Queue a `Discovered` event for every tab already open
pub async fn discover_open_tabs(tabs: &dyn TabHost, events: &EventSender) -> Result<usize> {
    let open = tabs.query_tabs(None).await?;
    let count = open.len();
    for tab in open {
        events.send(TabEvent::Discovered(tab))?;
    }
    Ok(count)
}

/// Handle held by `background.js`; each listener forwards into it
#[wasm_bindgen]
pub struct Background {
    events: EventSender,
    router: Rc<MessageRouter>,
}

#[wasm_bindgen]
impl Background {
    pub fn tab_created(&self, tab: JsValue) {
        match from_js::<Tab>(tab) {
            Ok(tab) => self.dispatch(TabEvent::Created(tab)),
            Err(e) => log::warn!("Ignoring onCreated payload: {}", e),
        }
    }

    pub fn tab_updated(&self, tab_id: i32, change: JsValue, tab: JsValue) {
        match (from_js::<ChangeInfo>(change), from_js::<Tab>(tab)) {
            (Ok(change), Ok(tab)) => self.dispatch(TabEvent::Updated { tab_id, change, tab }),
            (Err(e), _) | (_, Err(e)) => log::warn!("Ignoring onUpdated payload for tab {}: {}", tab_id, e),
        }
    }

    pub fn tab_activated(&self, active_info: JsValue) {
        match from_js::<ActiveInfo>(active_info) {
            Ok(info) => self.dispatch(TabEvent::Activated(info)),
            Err(e) => log::warn!("Ignoring onActivated payload: {}", e),
        }
    }

    pub fn tab_removed(&self, tab_id: i32) {
        self.dispatch(TabEvent::Removed { tab_id });
    }

    /// Answer a `chrome.runtime` message; the promise always resolves
    pub fn handle_message(&self, message: JsValue) -> js_sys::Promise {
        let router = self.router.clone();
        future_to_promise(async move {
            let response = match from_js::<serde_json::Value>(message) {
                Ok(message) => router.handle_value(message).await,
                Err(e) => Response::error(e.to_string()),
            };
            to_js(&response).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }
}

impl Background {
    fn dispatch(&self, event: TabEvent) {
        if let Err(e) = self.events.send(event) {
            log::error!("{}", e);
        }
    }
}

/// Build the background services on the real Chrome APIs and start the event pump
pub fn start() -> Background {
    let services = Services::new(
        Rc::new(ChromeTabs),
        Rc::new(ChromeStorage::local()),
        Rc::new(ChromeStorage::sync()),
        Rc::new(JsClock),
    );
    let (events, pump) = services.dispatcher().start();
    spawn_local(pump.run());

    let tabs = services.tabs.clone();
    let discovery = events.clone();
    spawn_local(async move {
        match discover_open_tabs(tabs.as_ref(), &discovery).await {
            Ok(count) => log::info!("Tracking {} open tabs", count),
            Err(e) => log::warn!("Failed to list open tabs: {}", e),
        }
    });

    log::info!("Background started");
    Background {
        events,
        router: services.router,
    }
}
