//! Rescheduler for the live timeline.
//!
//! Reconciles the planned start of the cursor item against the wall clock
//! and reflows every later item so the day stays contiguous:
//! - Slightly early (inside the grace period): nothing changes
//! - Well ahead of plan: the cursor item is pulled forward to `now`
//! - Started or overrunning: the cursor item's duration becomes the actual
//!   elapsed time
//!
//! After propagation the cursor moves on once its item has started.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use crate::error::TimelineError;
use crate::timeline::{snap_to_grid, Timeline, DEFAULT_GRID_MINUTES};

/// Longest grace period honoured (one day).
pub const MAX_GRACE_MINUTES: i64 = 24 * 60;

/// Rescheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Grid that propagated start times snap to (minutes)
    pub grid_minutes: u32,
    /// Early gap still treated as intentional slack (minutes)
    pub grace_minutes: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            grid_minutes: DEFAULT_GRID_MINUTES,
            grace_minutes: 5,
        }
    }
}

/// What a reschedule pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleOutcome {
    /// Cursor is past the last item.
    PlanComplete,
    /// The cursor item starts within the grace period; nothing changed.
    GracePeriod {
        description: String,
        starts_in: Duration,
    },
    /// The cursor item was moved up to start now.
    PulledForward { description: String, advanced: bool },
    /// The cursor item's duration was set to the time actually spent.
    Overrun {
        description: String,
        actual: Duration,
        advanced: bool,
    },
    /// The cursor item starts exactly now; the plan already matches reality.
    AlreadyStarted { description: String },
}

impl RescheduleOutcome {
    /// Whether the cursor moved on to the next item.
    pub fn advanced(&self) -> bool {
        match self {
            Self::PulledForward { advanced, .. } | Self::Overrun { advanced, .. } => *advanced,
            _ => false,
        }
    }
}

/// Rescheduler for a [`Timeline`]
pub struct Rescheduler {
    config: SchedulerConfig,
}

impl Rescheduler {
    /// Create a new rescheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Grace period, clamped to `0..=MAX_GRACE_MINUTES`.
    pub fn grace(&self) -> Duration {
        Duration::minutes(self.config.grace_minutes.clamp(0, MAX_GRACE_MINUTES))
    }

    /// Reconcile the cursor item with `now` and reflow the rest of the day.
    ///
    /// Deterministic for a fixed `now`; calling it again with the same `now`
    /// leaves the timeline unchanged.
    ///
    /// # Errors
    /// Returns [`TimelineError::EmptySchedule`] when nothing is scheduled.
    pub fn reschedule(
        &self,
        timeline: &mut Timeline,
        now: NaiveDateTime,
    ) -> Result<RescheduleOutcome, TimelineError> {
        if timeline.scheduled().is_empty() {
            return Err(TimelineError::EmptySchedule);
        }
        let cursor = timeline.cursor();
        let Some(current) = timeline.current() else {
            debug!(cursor, "plan complete, nothing to reschedule");
            return Ok(RescheduleOutcome::PlanComplete);
        };
        let description = current.description.clone();
        let start = current.start;

        let propagate_from;
        let mut actual = None;
        if now < start {
            let starts_in = start - now;
            if starts_in < self.grace() {
                debug!(%starts_in, "inside grace period");
                return Ok(RescheduleOutcome::GracePeriod {
                    description,
                    starts_in,
                });
            }
            timeline.scheduled_mut()[cursor].start = now;
            propagate_from = cursor;
        } else if now == start {
            return Ok(RescheduleOutcome::AlreadyStarted { description });
        } else {
            let elapsed = now - start;
            timeline.scheduled_mut()[cursor].duration = elapsed;
            actual = Some(elapsed);
            propagate_from = cursor + 1;
        }

        self.propagate(timeline, propagate_from, now);

        let advanced = timeline
            .current()
            .is_some_and(|item| item.start <= now);
        if advanced {
            timeline.set_cursor(cursor + 1);
        }

        let outcome = match actual {
            Some(actual) => RescheduleOutcome::Overrun {
                description,
                actual,
                advanced,
            },
            None => RescheduleOutcome::PulledForward {
                description,
                advanced,
            },
        };
        info!(?outcome, cursor = timeline.cursor(), "rescheduled");
        Ok(outcome)
    }

    /// Recompute start times from `from` to the end: index 0 anchors to
    /// `now`, every other item starts where its predecessor ends.
    fn propagate(&self, timeline: &mut Timeline, from: usize, now: NaiveDateTime) {
        let items = timeline.scheduled_mut();
        for i in from..items.len() {
            let start = if i == 0 { now } else { items[i - 1].end() };
            items[i].start = snap_to_grid(start, self.config.grid_minutes);
        }
    }
}

impl Default for Rescheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ScheduledItem;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn item(h: u32, m: u32, minutes: i64, text: &str) -> ScheduledItem {
        ScheduledItem::raw(at(h, m), Duration::minutes(minutes), text)
    }

    fn day() -> Timeline {
        Timeline::from_parts(
            Vec::new(),
            vec![
                item(9, 0, 20, "Email"),
                item(9, 20, 30, "Report"),
                item(9, 50, 10, "Call"),
            ],
        )
    }

    fn starts(timeline: &Timeline) -> Vec<NaiveDateTime> {
        timeline.scheduled().iter().map(|i| i.start).collect()
    }

    #[test]
    fn overrun_before_planned_end_shortens_and_advances() {
        let mut timeline = day();
        let outcome = Rescheduler::new().reschedule(&mut timeline, at(9, 10)).unwrap();

        assert_eq!(
            outcome,
            RescheduleOutcome::Overrun {
                description: "Email".into(),
                actual: Duration::minutes(10),
                advanced: true,
            }
        );
        assert_eq!(timeline.scheduled()[0].duration, Duration::minutes(10));
        assert_eq!(starts(&timeline), vec![at(9, 0), at(9, 10), at(9, 40)]);
        assert_eq!(timeline.cursor(), 1);
    }

    #[test]
    fn overrun_past_planned_end_stretches() {
        let mut timeline = day();
        Rescheduler::new().reschedule(&mut timeline, at(9, 35)).unwrap();
        assert_eq!(timeline.scheduled()[0].duration, Duration::minutes(35));
        assert_eq!(starts(&timeline), vec![at(9, 0), at(9, 35), at(10, 5)]);
    }

    #[test]
    fn overrun_off_grid_snaps_following_items() {
        let mut timeline = day();
        Rescheduler::new().reschedule(&mut timeline, at(9, 12)).unwrap();
        assert_eq!(timeline.scheduled()[0].duration, Duration::minutes(12));
        assert_eq!(timeline.scheduled()[1].start, at(9, 15));
        assert_eq!(timeline.scheduled()[2].start, at(9, 45));
    }

    #[test]
    fn grace_period_changes_nothing() {
        let mut timeline = day();
        let before = timeline.clone();
        let outcome = Rescheduler::new().reschedule(&mut timeline, at(8, 57)).unwrap();
        assert_eq!(
            outcome,
            RescheduleOutcome::GracePeriod {
                description: "Email".into(),
                starts_in: Duration::minutes(3),
            }
        );
        assert_eq!(timeline, before);
    }

    #[test]
    fn early_start_pulls_first_item_forward() {
        let mut timeline = day();
        let outcome = Rescheduler::new().reschedule(&mut timeline, at(8, 30)).unwrap();
        assert!(matches!(
            outcome,
            RescheduleOutcome::PulledForward { advanced: true, .. }
        ));
        assert_eq!(starts(&timeline), vec![at(8, 30), at(8, 50), at(9, 20)]);
        assert_eq!(timeline.cursor(), 1);
    }

    #[test]
    fn pull_forward_past_first_item_reflows_from_predecessor() {
        let mut timeline = Timeline::from_parts(
            Vec::new(),
            vec![item(9, 0, 20, "Email"), item(10, 0, 30, "Report")],
        );
        timeline.select_starting_point(at(9, 30));
        assert_eq!(timeline.cursor(), 1);

        let outcome = Rescheduler::new().reschedule(&mut timeline, at(9, 30)).unwrap();
        // The predecessor ended at 09:20, so the item lands there and counts
        // as started.
        assert!(outcome.advanced());
        assert_eq!(timeline.scheduled()[1].start, at(9, 20));
        assert!(timeline.is_complete());
    }

    #[test]
    fn exact_start_is_already_converged() {
        let mut timeline = day();
        let before = timeline.clone();
        let outcome = Rescheduler::new().reschedule(&mut timeline, at(9, 0)).unwrap();
        assert!(matches!(outcome, RescheduleOutcome::AlreadyStarted { .. }));
        assert_eq!(timeline, before);
    }

    #[test]
    fn second_pass_with_same_now_is_a_no_op() {
        let rescheduler = Rescheduler::new();
        for now in [at(8, 30), at(9, 10), at(9, 12), at(9, 35), at(10, 30)] {
            let mut timeline = day();
            rescheduler.reschedule(&mut timeline, now).unwrap();
            let first = timeline.clone();
            rescheduler.reschedule(&mut timeline, now).unwrap();
            assert_eq!(timeline, first, "not idempotent at {now}");
        }
    }

    #[test]
    fn advancing_clock_ratchets_cursor() {
        let rescheduler = Rescheduler::new();
        let mut timeline = day();
        rescheduler.reschedule(&mut timeline, at(9, 10)).unwrap();
        assert_eq!(timeline.cursor(), 1);
        rescheduler.reschedule(&mut timeline, at(9, 25)).unwrap();
        assert_eq!(timeline.cursor(), 2);
        assert_eq!(timeline.scheduled()[1].duration, Duration::minutes(15));
        rescheduler.reschedule(&mut timeline, at(9, 40)).unwrap();
        assert!(timeline.is_complete());
        assert_eq!(
            rescheduler.reschedule(&mut timeline, at(9, 45)).unwrap(),
            RescheduleOutcome::PlanComplete
        );
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let mut timeline = Timeline::new();
        assert_eq!(
            Rescheduler::new().reschedule(&mut timeline, at(9, 0)),
            Err(TimelineError::EmptySchedule)
        );
    }

    #[test]
    fn reschedule_repairs_gap_after_insertion() {
        let mut timeline = Timeline::from_parts(
            Vec::new(),
            vec![item(9, 0, 30, "Focus"), item(10, 0, 30, "Meeting")],
        );
        timeline.insert_after(0, 10, "Call").unwrap();
        Rescheduler::new().reschedule(&mut timeline, at(9, 30)).unwrap();
        assert_eq!(starts(&timeline), vec![at(9, 0), at(9, 30), at(9, 40)]);
    }

    #[test]
    fn custom_grace_period() {
        let rescheduler = Rescheduler::with_config(SchedulerConfig {
            grace_minutes: 15,
            ..SchedulerConfig::default()
        });
        let mut timeline = day();
        let outcome = rescheduler.reschedule(&mut timeline, at(8, 50)).unwrap();
        assert!(matches!(outcome, RescheduleOutcome::GracePeriod { .. }));
    }

    #[test]
    fn out_of_range_grace_is_clamped() {
        let rescheduler = Rescheduler::with_config(SchedulerConfig {
            grace_minutes: i64::MAX,
            ..SchedulerConfig::default()
        });
        assert_eq!(rescheduler.grace(), Duration::minutes(MAX_GRACE_MINUTES));

        let rescheduler = Rescheduler::with_config(SchedulerConfig {
            grace_minutes: -10,
            ..SchedulerConfig::default()
        });
        assert_eq!(rescheduler.grace(), Duration::zero());
    }
}
