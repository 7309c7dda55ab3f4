//! Serializing a timeline back into the day document.

use chrono::{Duration, NaiveDateTime};

use super::{BACKLOG_HEADER, END_OF_DAY_LABEL, SCHEDULE_HEADER};
use crate::timeline::{ScheduledItem, Timeline};

/// `H:MM`, hours unbounded.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{}:{:02}", total / 60, total % 60)
}

/// `M:SS` countdown/elapsed clock, minutes unbounded.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{}:{:02}", total / 60, total % 60)
}

/// `HH:MM - H:MMh description`
pub fn format_schedule_line(item: &ScheduledItem) -> String {
    format!(
        "{} - {}h {}",
        item.start.format("%H:%M"),
        format_duration(item.duration),
        item.description
    )
}

/// `HH:MM - Feierabend`
pub fn format_end_line(end: NaiveDateTime) -> String {
    format!("{} - {END_OF_DAY_LABEL}", end.format("%H:%M"))
}

/// Render the full document. Empty sections are omitted.
pub fn serialize(timeline: &Timeline) -> String {
    let mut out = String::new();

    if !timeline.backlog().is_empty() {
        out.push_str(BACKLOG_HEADER);
        out.push_str("\n\n");
        for entry in timeline.backlog() {
            out.push_str("- ");
            out.push_str(entry);
            out.push('\n');
        }
    }

    if let Some(end) = timeline.end_of_day() {
        out.push('\n');
        out.push_str(SCHEDULE_HEADER);
        out.push_str("\n\n");
        for item in timeline.scheduled() {
            out.push_str(&format_schedule_line(item));
            out.push('\n');
        }
        out.push_str(&format_end_line(end));
        out.push('\n');
    }

    out
}
