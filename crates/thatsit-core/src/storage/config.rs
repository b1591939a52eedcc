//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Cutoff prefilled in the setup form and the required password length
//! - Countdown urgency thresholds and the redraw interval
//! - Lock screen wording
//!
//! Configuration is stored at `~/.config/thatsit/config.toml`.
//! Nothing about the running session is ever written here.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::data_dir;
use crate::error::ConfigError;
use crate::lock::Schedule;
use crate::setup::{DEFAULT_CUTOFF, PASSWORD_LENGTH};
use crate::urgency::{UrgencyThresholds, DEFAULT_CRITICAL_SECS, DEFAULT_URGENCY_WINDOW_SECS};

/// Setup form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_cutoff")]
    pub default_cutoff: String,
    #[serde(default = "default_password_length")]
    pub password_length: usize,
}

/// Countdown widget behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Color only changes inside this many final seconds.
    #[serde(default = "default_urgency_window_secs")]
    pub urgency_window_secs: u64,
    /// The widget pulses inside this many final seconds.
    #[serde(default = "default_critical_secs")]
    pub critical_secs: u64,
    /// Redraw and `tick` period of the front end.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Lock screen wording and feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_lock_headline")]
    pub lock_headline: String,
    #[serde(default = "default_lock_message")]
    pub lock_message: String,
    /// How long the input box shakes after a wrong password.
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/thatsit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Mirror the countdown into the tray / terminal title.
    #[serde(default = "default_true")]
    pub tray_enabled: bool,
}

// Default functions
fn default_cutoff() -> String {
    DEFAULT_CUTOFF.into()
}
fn default_password_length() -> usize {
    PASSWORD_LENGTH
}
fn default_urgency_window_secs() -> u64 {
    DEFAULT_URGENCY_WINDOW_SECS
}
fn default_critical_secs() -> u64 {
    DEFAULT_CRITICAL_SECS
}
fn default_tick_interval_ms() -> u64 {
    250
}
fn default_lock_headline() -> String {
    "That is enough for today.".into()
}
fn default_lock_message() -> String {
    "Shut it down. Go outside. Touch grass.".into()
}
fn default_shake_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            default_cutoff: default_cutoff(),
            password_length: default_password_length(),
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            urgency_window_secs: default_urgency_window_secs(),
            critical_secs: default_critical_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            lock_headline: default_lock_headline(),
            lock_message: default_lock_message(),
            shake_ms: default_shake_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock: LockConfig::default(),
            countdown: CountdownConfig::default(),
            ui: UiConfig::default(),
            tray_enabled: true,
        }
    }
}

impl CountdownConfig {
    pub fn thresholds(&self) -> UrgencyThresholds {
        UrgencyThresholds {
            window: Duration::seconds(threshold_secs(self.urgency_window_secs)),
            critical: Duration::seconds(threshold_secs(self.critical_secs)),
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

/// Upper bound for the urgency window and critical threshold.
pub const MAX_THRESHOLD_SECS: u64 = 86_400;

fn threshold_secs(secs: u64) -> i64 {
    // `validate` rejects anything above the bound.
    secs.min(MAX_THRESHOLD_SECS) as i64
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
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot assign to a table".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                debug!(path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
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

    /// Reject values the front end cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock.password_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "lock.password_length".into(),
                message: "must be at least 1".into(),
            });
        }
        if let Err(e) = self.lock.default_cutoff.parse::<Schedule>() {
            return Err(ConfigError::InvalidValue {
                key: "lock.default_cutoff".into(),
                message: e.to_string(),
            });
        }
        for (key, secs) in [
            ("countdown.urgency_window_secs", self.countdown.urgency_window_secs),
            ("countdown.critical_secs", self.countdown.critical_secs),
        ] {
            if secs > MAX_THRESHOLD_SECS {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("must be at most {MAX_THRESHOLD_SECS}"),
                });
            }
        }
        if self.countdown.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "countdown.tick_interval_ms".into(),
                message: "must be at least 1".into(),
            });
        }
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

    /// Update a value in memory by dot-separated key, keeping the config valid.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.lock.password_length, 12);
        assert_eq!(parsed.countdown.urgency_window_secs, 600);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.lock.default_cutoff, "17:00");
        assert_eq!(cfg.countdown.critical_secs, 60);
        assert_eq!(cfg.countdown.tick_interval_ms, 250);
        assert_eq!(cfg.ui.shake_ms, 500);
        assert_eq!(cfg.ui.lock_headline, "That is enough for today.");
        assert!(cfg.tray_enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[lock]\ndefault_cutoff = \"22:30\"\n").unwrap();
        assert_eq!(cfg.lock.default_cutoff, "22:30");
        assert_eq!(cfg.lock.password_length, 12);
        assert_eq!(cfg.ui.shake_ms, 500);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("lock.password_length").as_deref(), Some("12"));
        assert_eq!(cfg.get("lock.default_cutoff").as_deref(), Some("17:00"));
        assert_eq!(cfg.get("tray_enabled").as_deref(), Some("true"));
        assert!(cfg.get("lock.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_typed_fields() {
        let mut cfg = Config::default();
        cfg.set_value("countdown.critical_secs", "30").unwrap();
        cfg.set_value("tray_enabled", "false").unwrap();
        cfg.set_value("lock.default_cutoff", "21:15").unwrap();
        assert_eq!(cfg.countdown.critical_secs, 30);
        assert!(!cfg.tray_enabled);
        assert_eq!(cfg.lock.default_cutoff, "21:15");
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("lock.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("lock", "1"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("tray_enabled", "not_a_bool").is_err());
        assert!(cfg.set_value("lock.password_length", "-3").is_err());
        assert_eq!(cfg.lock.password_length, 12);
    }

    #[test]
    fn set_value_keeps_config_valid() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("lock.password_length", "0").is_err());
        assert!(cfg.set_value("lock.default_cutoff", "noon").is_err());
        assert!(cfg.set_value("countdown.tick_interval_ms", "0").is_err());
        assert_eq!(cfg.lock.default_cutoff, "17:00");
    }

    #[test]
    fn oversized_thresholds_are_rejected() {
        let mut cfg = Config::default();
        let err = cfg
            .set_value("countdown.urgency_window_secs", "86401")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "countdown.urgency_window_secs"
        ));
        assert!(cfg.set_value("countdown.critical_secs", "100000").is_err());
        assert_eq!(cfg.countdown.urgency_window_secs, 600);

        cfg.set_value("countdown.urgency_window_secs", "86400").unwrap();
        assert_eq!(cfg.countdown.thresholds().window, Duration::days(1));
    }

    #[test]
    fn thresholds_from_config() {
        let cfg = Config::default();
        let t = cfg.countdown.thresholds();
        assert_eq!(t, UrgencyThresholds::default());
        assert_eq!(
            cfg.countdown.tick_interval(),
            std::time::Duration::from_millis(250)
        );
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.lock.password_length, 12);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set_value("ui.shake_ms", "750").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.shake_ms, 750);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "lock = [not valid").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lock]\npassword_length = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
