//! Theme and timezone preferences, kept in the kv store next to the engine
//! snapshots.

use crate::clock::Zone;
use crate::error::StorageError;
use crate::storage::{Config, KvStore};

pub const DARK_MODE_KEY: &str = "dark_mode";
pub const TIMEZONE_KEY: &str = "timezone";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub dark_mode: bool,
    pub timezone: Zone,
}

impl Preferences {
    /// Read stored preferences, falling back to the config and then to the
    /// host. Unreadable values are deleted.
    ///
    /// # Errors
    /// Returns an error only if the store itself fails.
    pub fn load(store: &impl KvStore, config: &Config) -> Result<Self, StorageError> {
        let dark_mode = match store.get(DARK_MODE_KEY)?.as_deref() {
            Some("enabled") => true,
            Some("disabled") => false,
            Some(other) => {
                tracing::warn!(value = other, "unreadable dark mode preference");
                store.remove(DARK_MODE_KEY)?;
                config.ui.dark_mode
            }
            None => config.ui.dark_mode,
        };

        let stored_zone = match store.get(TIMEZONE_KEY)? {
            Some(name) => match name.parse::<Zone>() {
                Ok(zone) => Some(zone),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable timezone preference");
                    store.remove(TIMEZONE_KEY)?;
                    None
                }
            },
            None => None,
        };
        let timezone = stored_zone
            .or_else(|| config.timezone())
            .unwrap_or_else(Zone::detect);

        Ok(Self {
            dark_mode,
            timezone,
        })
    }

    /// # Errors
    /// Returns an error if the store rejects the write.
    pub fn set_dark_mode(&mut self, store: &impl KvStore, enabled: bool) -> Result<(), StorageError> {
        self.dark_mode = enabled;
        store.set(DARK_MODE_KEY, if enabled { "enabled" } else { "disabled" })
    }

    /// # Errors
    /// Returns an error if the store rejects the write.
    pub fn set_timezone(&mut self, store: &impl KvStore, zone: Zone) -> Result<(), StorageError> {
        self.timezone = zone;
        store.set(TIMEZONE_KEY, zone.name())
    }
}
