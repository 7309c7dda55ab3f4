//! Two-state line classifier for the day document.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;

use super::{BACKLOG_HEADER, SCHEDULE_HEADER};
use crate::timeline::ScheduledItem;

/// Which section of the document the classifier is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Backlog,
    Schedule,
}

/// A classified document line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Backlog(String),
    Schedule(ScheduledItem),
    Ignored,
}

fn schedule_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2})[.:]+(\d{2}).+?(\d{1,2})[:.](\d{2})[hm]?\s?(.+)$")
            .expect("schedule line pattern is valid")
    })
}

/// Feeds lines one at a time, switching to schedule mode at the
/// `# Zeitplan` header. Scheduled items are dated `today`.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    section: Section,
    today: NaiveDate,
}

impl LineClassifier {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            section: Section::default(),
            today,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn classify(&mut self, raw: &str) -> Line {
        let line = raw.trim();
        if line.is_empty() || line == BACKLOG_HEADER {
            return Line::Ignored;
        }
        if line.starts_with(SCHEDULE_HEADER) {
            self.section = Section::Schedule;
            return Line::Ignored;
        }

        match self.section {
            Section::Backlog => {
                let text = line.strip_prefix("- ").unwrap_or(line).trim();
                if text.is_empty() {
                    Line::Ignored
                } else {
                    Line::Backlog(text.to_string())
                }
            }
            Section::Schedule => self
                .parse_schedule_line(line)
                .map_or(Line::Ignored, Line::Schedule),
        }
    }

    fn parse_schedule_line(&self, line: &str) -> Option<ScheduledItem> {
        let caps = schedule_pattern().captures(line)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let dur_hours: i64 = caps[3].parse().ok()?;
        let dur_minutes: i64 = caps[4].parse().ok()?;
        let description = caps[5].trim();
        if description.is_empty() {
            return None;
        }

        let start = self
            .today
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0)?);
        let duration = Duration::hours(dur_hours) + Duration::minutes(dur_minutes);
        Some(ScheduledItem::raw(start, duration, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        today().and_hms_opt(h, m, 0).unwrap()
    }

    fn in_schedule() -> LineClassifier {
        let mut classifier = LineClassifier::new(today());
        assert_eq!(classifier.classify("# Zeitplan"), Line::Ignored);
        classifier
    }

    #[test]
    fn backlog_lines_strip_dash() {
        let mut classifier = LineClassifier::new(today());
        assert_eq!(classifier.classify("- Email"), Line::Backlog("Email".into()));
        assert_eq!(classifier.classify("Report"), Line::Backlog("Report".into()));
        assert_eq!(classifier.section(), Section::Backlog);
    }

    #[test]
    fn headers_and_blank_lines_are_ignored() {
        let mut classifier = LineClassifier::new(today());
        assert_eq!(classifier.classify("# Todos"), Line::Ignored);
        assert_eq!(classifier.classify(""), Line::Ignored);
        assert_eq!(classifier.classify("   "), Line::Ignored);
        assert_eq!(classifier.classify("# Zeitplan"), Line::Ignored);
        assert_eq!(classifier.section(), Section::Schedule);
    }

    #[test]
    fn schedule_line_parses_start_duration_and_text() {
        let mut classifier = in_schedule();
        assert_eq!(
            classifier.classify("09:15 - 0:30h Write report"),
            Line::Schedule(ScheduledItem::raw(at(9, 15), Duration::minutes(30), "Write report"))
        );
    }

    #[test]
    fn schedule_line_accepts_loose_separators() {
        let mut classifier = in_schedule();
        assert_eq!(
            classifier.classify("9.05 bis 1.15m Lunch"),
            Line::Schedule(ScheduledItem::raw(at(9, 5), Duration::minutes(75), "Lunch"))
        );
    }

    #[test]
    fn time_in_description_does_not_confuse_duration() {
        let mut classifier = in_schedule();
        match classifier.classify("10:00 - 0:20h Call Bob about 14:30 meeting") {
            Line::Schedule(item) => {
                assert_eq!(item.duration, Duration::minutes(20));
                assert_eq!(item.description, "Call Bob about 14:30 meeting");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn trailer_and_garbage_are_skipped() {
        let mut classifier = in_schedule();
        assert_eq!(classifier.classify("17:30 - Feierabend"), Line::Ignored);
        assert_eq!(classifier.classify("lunch at some point"), Line::Ignored);
        assert_eq!(classifier.classify("25:00 - 0:10h Impossible"), Line::Ignored);
    }
}
