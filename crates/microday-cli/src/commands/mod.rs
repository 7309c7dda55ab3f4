pub mod completions;
pub mod config;
pub mod run;
pub mod show;

use std::path::PathBuf;

use chrono::NaiveDate;
use microday_core::{Config, ConfigError};

/// The document named on the command line, or today's default name.
fn day_path(
    config: &Config,
    file: Option<PathBuf>,
    today: NaiveDate,
) -> Result<PathBuf, ConfigError> {
    match file {
        Some(file) => Ok(file),
        None => config.default_filename(today),
    }
}
