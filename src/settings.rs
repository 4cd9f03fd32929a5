/// User settings kept in `chrome.storage.sync`
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::host::StorageArea;
use crate::tab_data::MS_PER_MINUTE;

pub const INACTIVE_MINUTES_KEY: &str = "inactiveMinutes";
pub const DEFAULT_INACTIVE_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub inactive_minutes: u32,
}

impl Settings {
    pub fn threshold_ms(&self) -> i64 {
        i64::from(self.inactive_minutes) * MS_PER_MINUTE
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            inactive_minutes: DEFAULT_INACTIVE_MINUTES,
        }
    }
}

pub struct SettingsStore {
    area: Rc<dyn StorageArea>,
}

impl SettingsStore {
    pub fn new(area: Rc<dyn StorageArea>) -> Self {
        SettingsStore { area }
    }

    /// Read the current settings; unset or invalid values fall back to the defaults
    pub async fn load(&self) -> Result<Settings> {
        let stored = self.area.get(INACTIVE_MINUTES_KEY).await?;

        let inactive_minutes = match stored {
            None | Some(Value::Null) => DEFAULT_INACTIVE_MINUTES,
            Some(value) => match value.as_u64().and_then(|m| u32::try_from(m).ok()) {
                Some(minutes) if minutes >= 1 => minutes,
                _ => {
                    log::warn!("Ignoring invalid {} setting: {}", INACTIVE_MINUTES_KEY, value);
                    DEFAULT_INACTIVE_MINUTES
                }
            },
        };

        Ok(Settings { inactive_minutes })
    }

    pub async fn save(&self, settings: Settings) -> Result<()> {
        if settings.inactive_minutes < 1 {
            return Err(Error::InvalidThreshold(settings.inactive_minutes));
        }
        self.area
            .set(INACTIVE_MINUTES_KEY, Value::from(settings.inactive_minutes))
            .await
    }
}
