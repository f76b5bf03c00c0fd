//! TOML-based application configuration.
//!
//! Stores defaults and preferences that are not engine state:
//! - Initial theme and timezone
//! - Timer preset durations
//! - Alarm picker defaults
//! - Alarm sound settings
//! - Log level
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::alarm::{AlarmSetting, Period};
use crate::clock::Zone;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme used until the operator toggles it.
    #[serde(default)]
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    /// IANA zone used until one is selected. Host zone when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Preset durations in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmDefaults {
    #[serde(default = "default_alarm_hour")]
    pub default_hour: u32,
    #[serde(default)]
    pub default_minute: u32,
    #[serde(default = "default_period")]
    pub default_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How many times the alarm melody cycles.
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alarm: AlarmDefaults,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// Default functions
fn default_presets() -> Vec<u32> {
    vec![1, 5, 10, 15, 30, 60]
}
fn default_alarm_hour() -> u32 {
    7
}
fn default_period() -> String {
    "AM".into()
}
fn default_true() -> bool {
    true
}
fn default_repeats() -> u32 {
    3
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { dark_mode: false }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
        }
    }
}

impl Default for AlarmDefaults {
    fn default() -> Self {
        Self {
            default_hour: default_alarm_hour(),
            default_minute: 0,
            default_period: default_period(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repeats: default_repeats(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Array(_) => {
                        let items = value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| {
                                s.parse::<u64>()
                                    .map(serde_json::Value::from)
                                    .map_err(|_| invalid(format!("cannot parse '{s}' as number")))
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        serde_json::Value::Array(items)
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or fails validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// Arrays take a comma-separated list (`timer.presets 5,10,25`).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse or
    /// validate. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Names the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.clock.timezone {
            name.parse::<Zone>().map_err(|e| ConfigError::InvalidValue {
                key: "clock.timezone".into(),
                message: e.to_string(),
            })?;
        }
        if self.timer.presets.iter().any(|&m| m == 0) {
            return Err(ConfigError::InvalidValue {
                key: "timer.presets".into(),
                message: "presets must be positive minutes".into(),
            });
        }
        self.alarm_default(Zone::utc())?;
        if self.sound.repeats == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sound.repeats".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The configured starting timezone, if any and valid.
    pub fn timezone(&self) -> Option<Zone> {
        self.clock.timezone.as_deref().and_then(|s| s.parse().ok())
    }

    /// Alarm picker defaults as a setting in `zone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured defaults are out of range.
    pub fn alarm_default(&self, zone: Zone) -> Result<AlarmSetting, ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.into(),
            message,
        };
        let period: Period = self
            .alarm
            .default_period
            .parse()
            .map_err(|e: crate::error::ValidationError| invalid("alarm.default_period", e.to_string()))?;
        AlarmSetting::new(self.alarm.default_hour, self.alarm.default_minute, period, zone)
            .map_err(|e| invalid("alarm.default_hour", e.to_string()))
    }
}
