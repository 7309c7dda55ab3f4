//! Scheduled item type and grid snapping.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Default grid width in minutes.
pub const DEFAULT_GRID_MINUTES: u32 = 5;

/// Round `start` forward to the next grid boundary.
///
/// Only the minute component is inspected; seconds are carried along
/// unchanged. A grid of zero disables snapping.
pub fn snap_to_grid(start: NaiveDateTime, grid_minutes: u32) -> NaiveDateTime {
    if grid_minutes == 0 {
        return start;
    }
    let offset = start.minute() % grid_minutes;
    if offset == 0 {
        start
    } else {
        start + Duration::minutes(i64::from(grid_minutes - offset))
    }
}

/// A to-do with a concrete start time and planned duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledItem {
    pub start: NaiveDateTime,
    pub duration: Duration,
    pub description: String,
}

impl ScheduledItem {
    /// Build an item with `start` snapped to the default 5-minute grid.
    ///
    /// Duration and description are taken as given; a zero or negative
    /// duration is not rejected here.
    pub fn normalized(
        start: NaiveDateTime,
        duration: Duration,
        description: impl Into<String>,
    ) -> Self {
        Self::normalized_on(start, duration, description, DEFAULT_GRID_MINUTES)
    }

    /// Same as [`normalized`](Self::normalized) with an explicit grid width.
    pub fn normalized_on(
        start: NaiveDateTime,
        duration: Duration,
        description: impl Into<String>,
        grid_minutes: u32,
    ) -> Self {
        Self {
            start: snap_to_grid(start, grid_minutes),
            duration,
            description: description.into(),
        }
    }

    /// Build an item without touching `start` (used when reading a document).
    pub fn raw(start: NaiveDateTime, duration: Duration, description: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            description: description.into(),
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration
    }
}
