/// Inactive tab suggestions: filter by threshold, most inactive first
use std::rc::Rc;

use crate::error::Result;
use crate::host::{Clock, TabHost};
use crate::settings::SettingsStore;
use crate::storage::{TabRecords, TabStore};
use crate::tab_data::{MS_PER_MINUTE, Suggestion, SuggestionReason, Tab};
use crate::urls::is_privileged;

/// Rank open tabs by how long they have gone unaccessed
///
/// A tab is suggested when it has a stored record and
/// `now - lastAccessed >= threshold_ms`, with a last access in the future
/// counting as none elapsed. Tabs never seen by the tracker and
/// privileged pages are left out. The sort is stable, so equally inactive
/// tabs keep the browser's order.
pub fn rank_suggestions(
    tabs: &[Tab],
    records: &TabRecords,
    threshold_ms: i64,
    now: i64,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<(i64, Suggestion)> = tabs
        .iter()
        .filter_map(|tab| {
            let id = tab.id?;
            let url = tab.url.as_deref()?;
            if is_privileged(url) {
                return None;
            }

            let record = records.get(&id)?;
            let inactive_ms = record.inactive_ms(now);
            if inactive_ms < threshold_ms {
                return None;
            }

            let suggestion = Suggestion {
                tab_id: id,
                title: tab
                    .title
                    .clone()
                    .filter(|title| !title.is_empty())
                    .unwrap_or_else(|| "Untitled".to_string()),
                url: url.to_string(),
                last_accessed: record.last_accessed,
                inactivity_minutes: inactive_ms as f64 / MS_PER_MINUTE as f64,
                reason: SuggestionReason::Inactive,
                favicon_url: tab.fav_icon_url.clone().or_else(|| record.favicon_url.clone()),
            };
            Some((inactive_ms, suggestion))
        })
        .collect();

    // Most inactive first
    suggestions.sort_by(|a, b| b.0.cmp(&a.0));

    suggestions.into_iter().map(|(_, suggestion)| suggestion).collect()
}

/// Read-only view over tracked activity that answers suggestion requests
pub struct SuggestionRanker {
    tabs: Rc<dyn TabHost>,
    store: Rc<TabStore>,
    settings: Rc<SettingsStore>,
    clock: Rc<dyn Clock>,
}

impl SuggestionRanker {
    pub fn new(
        tabs: Rc<dyn TabHost>,
        store: Rc<TabStore>,
        settings: Rc<SettingsStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        SuggestionRanker {
            tabs,
            store,
            settings,
            clock,
        }
    }

    pub async fn suggestions(&self, window_id: Option<i32>) -> Result<Vec<Suggestion>> {
        let tabs = self.tabs.query_tabs(window_id).await?;
        let records = self.store.records().await?;
        let settings = self.settings.load().await?;
        let now = self.clock.now_ms();

        let suggestions = rank_suggestions(&tabs, &records, settings.threshold_ms(), now);
        log::debug!(
            "{} of {} tabs inactive for {}+ minutes",
            suggestions.len(),
            tabs.len(),
            settings.inactive_minutes
        );
        Ok(suggestions)
    }
}
