//! Error types for microday-core.
//!
//! Malformed document lines never surface here: the classifier skips them.
//! What remains are caller bugs (index preconditions), storage failures and
//! configuration problems.

use std::path::PathBuf;
use thiserror::Error;

/// Contract violations on the timeline.
///
/// These indicate a bug in the caller rather than bad user data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Rescheduling requires at least one scheduled item
    #[error("Cannot reschedule an empty schedule")]
    EmptySchedule,

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}

/// Day-file errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the document
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the document back
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine or create the config directory
    #[error("Config directory unavailable: {0}")]
    NoDataDir(String),
}
