//! Timeline model.
//!
//! This module provides:
//! - Scheduled items with 5-minute grid snapping
//! - The backlog/schedule pair with its cursor
//! - Status computation for the live display

mod item;
mod model;
mod status;

pub use item::{snap_to_grid, ScheduledItem, DEFAULT_GRID_MINUTES};
pub use model::Timeline;
pub use status::{Countdown, NextUp, Status};
