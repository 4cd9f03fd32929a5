/// Popup ↔ background message protocol
///
/// Requests carry a `type` tag:
/// - `{ "type": "GET_TAB_SUGGESTIONS", "windowId": 3 }` → `{ "suggestions": [...] }`
/// - `{ "type": "CLOSE_TAB", "tabId": 12 }` → `{ "success": true }`
///
/// Any failure is answered with `{ "error": "..." }`.
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ranking::SuggestionRanker;
use crate::tab_data::Suggestion;
use crate::tracker::TabTracker;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    GetTabSuggestions {
        #[serde(rename = "windowId", default, skip_serializing_if = "Option::is_none")]
        window_id: Option<i32>,
    },
    CloseTab {
        #[serde(rename = "tabId")]
        tab_id: i32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Suggestions { suggestions: Vec<Suggestion> },
    Closed { success: bool },
    Error { error: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }
}

/// Serves popup requests from the background services
pub struct MessageRouter {
    tracker: Rc<TabTracker>,
    ranker: Rc<SuggestionRanker>,
}

impl MessageRouter {
    pub fn new(tracker: Rc<TabTracker>, ranker: Rc<SuggestionRanker>) -> Self {
        MessageRouter { tracker, ranker }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetTabSuggestions { window_id } => match self.ranker.suggestions(window_id).await {
                Ok(suggestions) => Response::Suggestions { suggestions },
                Err(e) => {
                    log::error!("Failed to compute suggestions: {}", e);
                    Response::error(e.to_string())
                }
            },
            Request::CloseTab { tab_id } => match self.tracker.close_tab(tab_id).await {
                Ok(()) => Response::Closed { success: true },
                // A browser refusal was already logged by the tracker
                Err(e) if e.is_host() => Response::error(e.to_string()),
                Err(e) => {
                    log::error!("Failed to forget closed tab {}: {}", tab_id, e);
                    Response::error(e.to_string())
                }
            },
        }
    }

    /// Handle a raw JSON message; unknown messages get an error response
    pub async fn handle_value(&self, message: serde_json::Value) -> Response {
        match serde_json::from_value::<Request>(message) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                log::warn!("Unrecognized message: {}", e);
                Response::error(format!("Unrecognized message: {}", e))
            }
        }
    }
}
