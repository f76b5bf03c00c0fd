//! Snapshot persistence shared by all engines.
//!
//! A snapshot is a timestamped JSON copy of an engine's state. It is only
//! read at startup; while the process runs, the in-memory engine is
//! authoritative and the stored copy is a mirror.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KvStore;
use crate::error::StorageError;
use crate::events::Event;

/// An engine rebuilt from its snapshot, plus whatever it raised while
/// catching up on the time it was not running.
#[derive(Debug)]
pub struct Restored<E> {
    pub engine: E,
    pub events: Vec<Event>,
}

impl<E: Default> Restored<E> {
    pub fn fresh() -> Self {
        Self {
            engine: E::default(),
            events: Vec::new(),
        }
    }
}

/// An engine that mirrors its state into a [`KvStore`] under one key.
pub trait Persisted: Sized + Default {
    const KEY: &'static str;
    type Snapshot: Serialize + DeserializeOwned;

    /// `None` means there is nothing worth keeping and the key is erased.
    fn to_snapshot(&self) -> Option<Self::Snapshot>;

    /// Rebuild from a snapshot, compensating for time elapsed since it was
    /// written. Returns `None` when the snapshot is internally inconsistent.
    fn restore(snapshot: Self::Snapshot, now: DateTime<Utc>) -> Option<Restored<Self>>;
}

/// Write the engine's snapshot, or erase its key when it has none.
///
/// # Errors
/// Returns an error if the store rejects the write.
pub fn save<E: Persisted>(store: &impl KvStore, engine: &E) -> Result<(), StorageError> {
    match engine.to_snapshot() {
        Some(snapshot) => {
            let json = serde_json::to_string(&snapshot)
                .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
            tracing::debug!(key = E::KEY, %json, "saving snapshot");
            store.set(E::KEY, &json)
        }
        None => {
            tracing::debug!(key = E::KEY, "erasing snapshot");
            store.remove(E::KEY)
        }
    }
}

/// Restore an engine from the store.
///
/// A missing key yields defaults. A corrupt key is deleted and also yields
/// defaults. The restored state is written back so that stale or finished
/// snapshots are erased immediately.
///
/// # Errors
/// Returns an error only if the store itself fails.
pub fn load<E: Persisted>(store: &impl KvStore, now: DateTime<Utc>) -> Result<Restored<E>, StorageError> {
    let Some(json) = store.get(E::KEY)? else {
        return Ok(Restored::fresh());
    };

    let restored = match serde_json::from_str::<E::Snapshot>(&json) {
        Ok(snapshot) => E::restore(snapshot, now),
        Err(e) => {
            tracing::warn!(key = E::KEY, error = %e, "malformed snapshot");
            None
        }
    };

    match restored {
        Some(restored) => {
            tracing::info!(key = E::KEY, events = restored.events.len(), "restored snapshot");
            save(store, &restored.engine)?;
            Ok(restored)
        }
        None => {
            tracing::warn!(key = E::KEY, "discarding unusable snapshot");
            store.remove(E::KEY)?;
            Ok(Restored::fresh())
        }
    }
}

/// Whole seconds elapsed from `since` to `now`; zero if `since` is ahead.
pub(crate) fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - since).num_seconds()).unwrap_or(0)
}
