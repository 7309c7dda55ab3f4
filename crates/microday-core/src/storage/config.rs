//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Grid width and grace period for the rescheduler
//! - Day-file naming and fallback documents
//! - Spoken announcement command and phrasing
//! - Terminal colors and tick rate
//!
//! Configuration is stored at `~/.config/microday/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;
use crate::scheduler::{SchedulerConfig, MAX_GRACE_MINUTES};

/// Widest grid that still snaps within the hour.
const MAX_GRID_MINUTES: u32 = 60;

/// Rescheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_grid_minutes")]
    pub grid_minutes: u32,
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
}

/// Day-file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// strftime pattern for the default document name.
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
    /// Documents to read from when today's file does not exist yet.
    #[serde(default = "default_fallbacks")]
    pub fallbacks: Vec<String>,
}

/// Spoken announcement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnounceConfig {
    #[serde(default = "default_announce_enabled")]
    pub enabled: bool,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    /// `{task}` is replaced by the item description.
    #[serde(default = "default_one_minute_template")]
    pub one_minute_template: String,
    #[serde(default = "default_now_template")]
    pub now_template: String,
}

/// Terminal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub colors: bool,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/microday/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub announce: AnnounceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_grid_minutes() -> u32 {
    5
}
fn default_grace_minutes() -> i64 {
    5
}
fn default_name_pattern() -> String {
    "todo_%y-%m-%d.md".into()
}
fn default_fallbacks() -> Vec<String> {
    vec!["todo.md".into()]
}
fn default_announce_enabled() -> bool {
    cfg!(target_os = "macos")
}
fn default_command() -> String {
    "say".into()
}
fn default_voice() -> String {
    "Anna".into()
}
fn default_one_minute_template() -> String {
    "In einer Minute beginnt {task}".into()
}
fn default_now_template() -> String {
    "Jetzt beginnt {task}".into()
}
fn default_true() -> bool {
    true
}
fn default_tick_millis() -> u64 {
    1000
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            grid_minutes: default_grid_minutes(),
            grace_minutes: default_grace_minutes(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            name_pattern: default_name_pattern(),
            fallbacks: default_fallbacks(),
        }
    }
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            enabled: default_announce_enabled(),
            command: default_command(),
            voice: default_voice(),
            one_minute_template: default_one_minute_template(),
            now_template: default_now_template(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            colors: true,
            tick_millis: default_tick_millis(),
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as integer")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
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

    /// Reject values that deserialize fine but cannot be used.
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if self.schedule.grid_minutes > MAX_GRID_MINUTES {
            return Err(invalid(
                "schedule.grid_minutes",
                format!("must be between 0 and {MAX_GRID_MINUTES}"),
            ));
        }
        if !(0..=MAX_GRACE_MINUTES).contains(&self.schedule.grace_minutes) {
            return Err(invalid(
                "schedule.grace_minutes",
                format!("must be between 0 and {MAX_GRACE_MINUTES}"),
            ));
        }
        format_filename(&self.files.name_pattern, NaiveDate::default())?;
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let config: Self = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, or the value does not fit
    /// the field's type or range. The config is left unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Rescheduler settings derived from the `schedule` section.
    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            grid_minutes: self.schedule.grid_minutes,
            grace_minutes: self.schedule.grace_minutes,
        }
    }

    /// Default document name for `today`, e.g. `todo_24-03-04.md`.
    ///
    /// # Errors
    ///
    /// Returns an error if `files.name_pattern` is not a valid date pattern.
    pub fn default_filename(&self, today: NaiveDate) -> Result<PathBuf, ConfigError> {
        format_filename(&self.files.name_pattern, today)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

fn format_filename(pattern: &str, date: NaiveDate) -> Result<PathBuf, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        key: "files.name_pattern".to_string(),
        message: format!("'{pattern}' {message}"),
    };

    let mut name = String::new();
    write!(name, "{}", date.format(pattern))
        .map_err(|_| invalid("is not a valid date pattern"))?;
    if name.trim().is_empty() {
        return Err(invalid("yields an empty file name"));
    }
    Ok(PathBuf::from(name))
}
