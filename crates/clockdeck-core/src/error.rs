//! Core error types for clockdeck-core.
//!
//! Every failure in the library degrades to a safe default somewhere up the
//! stack; these types carry enough context for the caller to log or show it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for clockdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Operator input that was rejected
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Database is locked")]
    Locked,

    /// Home/data directory could not be prepared
    #[error("Data directory unavailable at {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors. The display text is shown to the operator as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timer duration was not a positive whole number of minutes
    #[error("Please enter a valid number of minutes.")]
    InvalidDuration { input: String },

    /// Alarm wall time out of range
    #[error("Invalid alarm time {hour:02}:{minute:02} (hour must be 1-12, minute 0-59)")]
    InvalidAlarmTime { hour: u32, minute: u32 },

    /// Neither AM nor PM
    #[error("Invalid period '{0}' (expected AM or PM)")]
    InvalidPeriod(String),

    /// Not an IANA timezone name
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Alarm audio failures. Never fatal: the ringing notification fires anyway.
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("Audio output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Audio disabled")]
    Disabled,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_duration_message_is_user_facing() {
        let err = ValidationError::InvalidDuration {
            input: "abc".into(),
        };
        assert_eq!(err.to_string(), "Please enter a valid number of minutes.");
    }

    #[test]
    fn validation_passes_through_core_error_display() {
        let err: CoreError = ValidationError::UnknownTimezone("Mars/Olympus".into()).into();
        assert_eq!(err.to_string(), "Unknown timezone: Mars/Olympus");
    }

    #[test]
    fn alarm_time_message_pads_values() {
        let err = ValidationError::InvalidAlarmTime { hour: 13, minute: 5 };
        assert!(err.to_string().starts_with("Invalid alarm time 13:05"));
    }
}
