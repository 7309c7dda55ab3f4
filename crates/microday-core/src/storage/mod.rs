mod config;
mod day_file;

pub use config::{AnnounceConfig, Config, FilesConfig, ScheduleConfig, UiConfig};
pub use day_file::{DayFile, Loaded};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/microday[-dev]/` based on MICRODAY_ENV.
///
/// Set MICRODAY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MICRODAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("microday-dev")
    } else {
        base_dir.join("microday")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(e.to_string()))?;
    Ok(dir)
}
