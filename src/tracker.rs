/// Tab activity tracking: records every access and forgets closed tabs
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::Result;
use crate::events::{TabEvent, TabEventHandler};
use crate::host::{Clock, TabHost};
use crate::settings::SettingsStore;
use crate::storage::{TabStore, TabVisit};
use crate::tab_data::{Tab, TabAnalytics, TabRecord};
use crate::urls::is_privileged;

pub struct TabTracker {
    tabs: Rc<dyn TabHost>,
    store: Rc<TabStore>,
    settings: Rc<SettingsStore>,
    clock: Rc<dyn Clock>,
}

impl TabTracker {
    pub fn new(
        tabs: Rc<dyn TabHost>,
        store: Rc<TabStore>,
        settings: Rc<SettingsStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        TabTracker {
            tabs,
            store,
            settings,
            clock,
        }
    }

    /// Record an access to `tab`
    ///
    /// Returns `None` when the tab is skipped: still loading (no id, url or
    /// title yet) or showing a privileged browser page.
    pub async fn track_tab(&self, tab: &Tab) -> Result<Option<TabRecord>> {
        let Some(visit) = visit_of(tab) else {
            log::debug!("Skipping tab with missing id/url/title: {:?}", tab.id);
            return Ok(None);
        };
        if is_privileged(&visit.url) {
            log::debug!("Skipping privileged tab {}", visit.id);
            return Ok(None);
        }

        let now = self.clock.now_ms();
        let record = self.store.record_visit(visit, now).await?;
        if record.access_count == 1 {
            log::info!("Tracking new tab {}", record.id);
        } else {
            log::debug!("Tab {} access count now {}", record.id, record.access_count);
        }

        let settings = self.settings.load().await?;
        let analytics = TabAnalytics::derive(&record, now, settings.threshold_ms());
        self.store.save_analytics(analytics).await?;

        Ok(Some(record))
    }

    /// Close a tab in the browser and drop its stored activity
    ///
    /// The records are deleted even when the browser refuses to close the
    /// tab; that refusal is logged and then returned.
    ///
    /// Returns the browser's error only after cleanup has finished, so an
    /// `Err` from the host still means the tab will not be suggested again.
    /// A storage failure during cleanup takes precedence over it.
    pub async fn close_tab(&self, tab_id: i32) -> Result<()> {
        let closed = self.tabs.remove_tab(tab_id).await;
        if let Err(e) = &closed {
            log::warn!("Failed to close tab {}: {}", tab_id, e);
        }

        self.forget_tab(tab_id).await?;
        closed
    }

    /// Drop stored activity for a tab the browser already closed
    pub async fn forget_tab(&self, tab_id: i32) -> Result<()> {
        if self.store.remove_tab(tab_id).await? {
            log::debug!("Removed records for tab {}", tab_id);
        }
        Ok(())
    }
}

fn visit_of(tab: &Tab) -> Option<TabVisit> {
    let id = tab.id?;
    let url = tab.url.as_deref().filter(|url| !url.is_empty())?;
    let title = tab.title.as_deref().filter(|title| !title.is_empty())?;

    Some(TabVisit {
        id,
        url: url.to_string(),
        title: title.to_string(),
        window_id: tab.window_id,
        favicon_url: tab.fav_icon_url.clone().filter(|icon| !icon.is_empty()),
    })
}

#[async_trait(?Send)]
impl TabEventHandler for TabTracker {
    async fn handle(&self, event: &TabEvent) -> Result<()> {
        match event {
            TabEvent::Created(tab) | TabEvent::Discovered(tab) => {
                self.track_tab(tab).await?;
            }
            TabEvent::Updated { change, tab, .. } => {
                if change.is_complete() && tab.url.is_some() {
                    self.track_tab(tab).await?;
                }
            }
            TabEvent::Activated(info) => match self.tabs.get_tab(info.tab_id).await {
                Ok(tab) => {
                    self.track_tab(&tab).await?;
                }
                Err(e) => log::warn!("Failed to track activated tab {}: {}", info.tab_id, e),
            },
            TabEvent::Removed { tab_id } => self.forget_tab(*tab_id).await?,
        }
        Ok(())
    }
}
