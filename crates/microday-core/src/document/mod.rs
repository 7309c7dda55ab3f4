//! The plain-text day document.
//!
//! ```text
//! # Todos
//!
//! - Email
//!
//! # Zeitplan
//!
//! 09:00 - 0:15h Email
//! 09:15 - Feierabend
//! ```
//!
//! Reading goes through [`LineClassifier`]; writing through [`serialize`].
//! Only hour and minute survive a round trip.

mod classify;
mod render;

use chrono::NaiveDate;

use crate::timeline::Timeline;

pub use classify::{Line, LineClassifier, Section};
pub use render::{format_clock, format_duration, format_end_line, format_schedule_line, serialize};

pub const BACKLOG_HEADER: &str = "# Todos";
pub const SCHEDULE_HEADER: &str = "# Zeitplan";
pub const END_OF_DAY_LABEL: &str = "Feierabend";

/// Parse a whole document. Lines that fit neither section are skipped.
pub fn parse(text: &str, today: NaiveDate) -> Timeline {
    let mut classifier = LineClassifier::new(today);
    let mut backlog = Vec::new();
    let mut scheduled = Vec::new();

    for line in text.lines() {
        match classifier.classify(line) {
            Line::Backlog(entry) => backlog.push(entry),
            Line::Schedule(item) => scheduled.push(item),
            Line::Ignored => {}
        }
    }

    Timeline::from_parts(backlog, scheduled)
}

impl Timeline {
    /// Parse a document dated `today`.
    pub fn parse(text: &str, today: NaiveDate) -> Self {
        parse(text, today)
    }

    /// Render the document for writing back to disk.
    pub fn serialize(&self) -> String {
        serialize(self)
    }
}
