//! # microday Core Library
//!
//! This library provides the core logic for microday, a minute-granularity
//! day planner driven from a plain-text document. The `microday` CLI is a
//! thin interactive layer over the same library.
//!
//! ## Architecture
//!
//! - **Timeline**: backlog plus a scheduled sequence with a cursor; new items
//!   snap to a 5-minute grid
//! - **Scheduler**: the rescheduler that reconciles plan and wall clock and
//!   reflows the rest of the day
//! - **Document**: line classifier and serializer for the day file
//! - **Storage**: day-file persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Timeline`]: Backlog, schedule and cursor
//! - [`Rescheduler`]: Drift correction for the cursor item
//! - [`DayFile`]: Load once, write back after every mutation
//! - [`Config`]: Application configuration management

pub mod announce;
pub mod document;
pub mod error;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use announce::{Cue, CueTracker};
pub use document::{Line, LineClassifier, Section};
pub use error::{ConfigError, StorageError, TimelineError};
pub use scheduler::{RescheduleOutcome, Rescheduler, SchedulerConfig};
pub use storage::{Config, DayFile, Loaded};
pub use timeline::{snap_to_grid, Countdown, NextUp, ScheduledItem, Status, Timeline};
