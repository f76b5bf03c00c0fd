mod config;
pub mod database;
mod memory;
pub(crate) mod snapshot;

pub use config::{AlarmDefaults, ClockConfig, Config, LogConfig, SoundConfig, TimerConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use snapshot::{load, save, Persisted, Restored};

use std::path::PathBuf;

use crate::error::StorageError;

/// Flat string key-value store that outlives the process.
///
/// One key per engine or preference; values are JSON snapshots or plain
/// strings. There is a single writer per key within one process.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `CLOCKDECK_DATA_DIR` wins when set. Otherwise `~/.config/clockdeck/`, or
/// `~/.config/clockdeck-dev/` with `CLOCKDECK_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CLOCKDECK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CLOCKDECK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("clockdeck-dev")
            } else {
                base_dir.join("clockdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
