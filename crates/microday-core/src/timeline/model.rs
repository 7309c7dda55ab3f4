//! The timeline model: backlog, scheduled sequence and cursor.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use super::item::{ScheduledItem, DEFAULT_GRID_MINUTES};
use crate::error::TimelineError;

/// Backlog plus scheduled sequence for a single day.
///
/// Each instance exclusively owns both sequences. The cursor always
/// satisfies `cursor <= scheduled.len()`; equality means the plan is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    backlog: Vec<String>,
    scheduled: Vec<ScheduledItem>,
    cursor: usize,
    grid_minutes: u32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            backlog: Vec::new(),
            scheduled: Vec::new(),
            cursor: 0,
            grid_minutes: DEFAULT_GRID_MINUTES,
        }
    }

    /// Build a timeline from already parsed sequences. Items are taken as-is.
    pub fn from_parts(backlog: Vec<String>, scheduled: Vec<ScheduledItem>) -> Self {
        Self {
            backlog,
            scheduled,
            ..Self::new()
        }
    }

    /// Set the grid width used when new items are created.
    pub fn with_grid(mut self, grid_minutes: u32) -> Self {
        self.grid_minutes = grid_minutes;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn backlog(&self) -> &[String] {
        &self.backlog
    }

    pub fn scheduled(&self) -> &[ScheduledItem] {
        &self.scheduled
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The item in progress or next up, `None` once the plan is complete.
    pub fn current(&self) -> Option<&ScheduledItem> {
        self.scheduled.get(self.cursor)
    }

    /// The item after the current one.
    pub fn upcoming(&self) -> Option<&ScheduledItem> {
        self.scheduled.get(self.cursor + 1)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.scheduled.len()
    }

    /// End of the last scheduled item.
    pub fn end_of_day(&self) -> Option<NaiveDateTime> {
        self.scheduled.last().map(ScheduledItem::end)
    }

    pub fn normalize(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        description: impl Into<String>,
    ) -> ScheduledItem {
        ScheduledItem::normalized_on(start, duration, description, self.grid_minutes)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add free text to the end of the backlog; a leading `- ` is stripped.
    pub fn push_backlog(&mut self, text: &str) {
        let text = text.trim();
        let text = text.strip_prefix("- ").unwrap_or(text).trim();
        if !text.is_empty() {
            self.backlog.push(text.to_string());
        }
    }

    /// Schedule backlog entry `backlog_index` for `minutes` minutes.
    ///
    /// The new item starts at `now` when nothing is scheduled yet, otherwise
    /// at the end of the last item, but never in the past.
    pub fn assign_duration(
        &mut self,
        backlog_index: usize,
        minutes: i64,
        now: NaiveDateTime,
    ) -> Result<&ScheduledItem, TimelineError> {
        if backlog_index >= self.backlog.len() {
            return Err(TimelineError::OutOfBounds {
                collection: "backlog",
                index: backlog_index,
                len: self.backlog.len(),
            });
        }

        let start = match self.end_of_day() {
            Some(end) if end >= now => end,
            _ => now,
        };
        let description = self.backlog.remove(backlog_index);
        let item = self.normalize(start, Duration::minutes(minutes), description);
        debug!(start = %item.start, minutes, description = %item.description, "scheduled backlog item");
        self.scheduled.push(item);

        let last = self.scheduled.len() - 1;
        Ok(&self.scheduled[last])
    }

    /// Insert a new item directly after `index`.
    ///
    /// The new item inherits the start of the item currently at `index + 1`,
    /// or the end of item `index` when it is the last one. Later items are
    /// left alone; the next reschedule closes any gap or overlap.
    pub fn insert_after(
        &mut self,
        index: usize,
        minutes: i64,
        description: impl Into<String>,
    ) -> Result<(), TimelineError> {
        let len = self.scheduled.len();
        if index >= len {
            return Err(TimelineError::OutOfBounds {
                collection: "schedule",
                index,
                len,
            });
        }

        let position = index + 1;
        let start = match self.scheduled.get(position) {
            Some(next) => next.start,
            None => self.scheduled[index].end(),
        };
        let item = self.normalize(start, Duration::minutes(minutes), description);
        debug!(position, start = %item.start, minutes, "inserted item");
        self.scheduled.insert(position, item);

        // Keep the cursor on the same logical item. A completed plan keeps
        // its cursor so an item appended at the end becomes current.
        if position < self.cursor || (position == self.cursor && self.cursor < len) {
            self.cursor += 1;
        }
        Ok(())
    }

    /// Move item `index` back to the front of the backlog.
    pub fn demote(&mut self, index: usize) -> Result<(), TimelineError> {
        if index >= self.scheduled.len() {
            return Err(TimelineError::OutOfBounds {
                collection: "schedule",
                index,
                len: self.scheduled.len(),
            });
        }

        let item = self.scheduled.remove(index);
        debug!(index, description = %item.description, "demoted item to backlog");
        self.backlog.insert(0, item.description);
        if index < self.cursor {
            self.cursor -= 1;
        }
        Ok(())
    }

    /// How many items have not ended by `now`.
    pub fn remaining(&self, now: NaiveDateTime) -> usize {
        self.scheduled.iter().filter(|item| item.end() >= now).count()
    }

    /// Indices of items that have not ended yet; the cursor moves to the
    /// first of them (or 0 when none remain).
    pub fn select_starting_point(&mut self, now: NaiveDateTime) -> Vec<usize> {
        let remaining: Vec<usize> = self
            .scheduled
            .iter()
            .enumerate()
            .filter(|(_, item)| item.end() >= now)
            .map(|(i, _)| i)
            .collect();
        self.cursor = remaining.first().copied().unwrap_or(0);
        remaining
    }

    /// Put every item that has not ended yet back into the backlog, keeping
    /// their relative order at the front. Returns how many were moved.
    pub fn demote_remaining(&mut self, now: NaiveDateTime) -> usize {
        let remaining = self.select_starting_point(now);
        for &index in remaining.iter().rev() {
            let item = self.scheduled.remove(index);
            self.backlog.insert(0, item.description);
        }
        self.cursor = self.cursor.min(self.scheduled.len());
        debug!(count = remaining.len(), "returned remaining items to backlog");
        remaining.len()
    }

    pub(crate) fn scheduled_mut(&mut self) -> &mut Vec<ScheduledItem> {
        &mut self.scheduled
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.scheduled.len());
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
