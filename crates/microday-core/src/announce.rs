//! Start-of-item cues for the live loop.
//!
//! Every tick reports how long until the watched items start (see
//! [`Status::countdowns`](crate::Status::countdowns)); the tracker turns
//! threshold crossings into cues. A cue fires once per crossing, no matter
//! how often the tick runs or whether it skips a second.

use chrono::Duration;

use crate::timeline::Countdown;

/// A spoken or printed notice about an upcoming item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// One minute until the item starts.
    OneMinute,
    /// The item starts now.
    Now,
}

impl Cue {
    fn threshold(self) -> Duration {
        match self {
            Self::OneMinute => Duration::seconds(60),
            Self::Now => Duration::zero(),
        }
    }
}

/// Remembers the previous tick so each boundary crossing fires once.
#[derive(Debug, Default)]
pub struct CueTracker {
    last: Vec<(usize, Duration)>,
}

impl CueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tick's countdowns and return the cues they crossed into.
    ///
    /// An item seen for the first time only primes the tracker.
    pub fn observe<'a>(&mut self, countdowns: &[Countdown<'a>]) -> Vec<(Cue, Countdown<'a>)> {
        let fired = countdowns
            .iter()
            .filter_map(|countdown| {
                let previous = self.previous(countdown.index)?;
                crossed(previous, countdown.left).map(|cue| (cue, *countdown))
            })
            .collect();

        self.last = countdowns.iter().map(|c| (c.index, c.left)).collect();
        fired
    }

    /// Forget every observation. Call after the schedule changes shape,
    /// since indices may then name different items.
    pub fn reset(&mut self) {
        self.last.clear();
    }

    fn previous(&self, index: usize) -> Option<Duration> {
        self.last
            .iter()
            .find(|(seen, _)| *seen == index)
            .map(|&(_, left)| left)
    }
}

fn crossed(previous: Duration, left: Duration) -> Option<Cue> {
    // Latest threshold first: a jump over both yields `Now`.
    [Cue::Now, Cue::OneMinute]
        .into_iter()
        .find(|cue| previous > cue.threshold() && left <= cue.threshold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{ScheduledItem, Timeline};
    use chrono::{NaiveDate, NaiveDateTime};

    fn secs(s: i64) -> Duration {
        Duration::seconds(s)
    }

    fn watch(tracker: &mut CueTracker, index: usize, left: i64) -> Option<Cue> {
        let countdown = Countdown {
            index,
            description: "Email",
            left: secs(left),
        };
        tracker.observe(&[countdown]).first().map(|(cue, _)| *cue)
    }

    #[test]
    fn first_observation_never_fires() {
        let mut tracker = CueTracker::new();
        assert_eq!(watch(&mut tracker, 0, 60), None);
        assert_eq!(watch(&mut tracker, 0, 59), None);
    }

    #[test]
    fn one_minute_fires_once_on_crossing() {
        let mut tracker = CueTracker::new();
        watch(&mut tracker, 0, 62);
        assert_eq!(watch(&mut tracker, 0, 61), None);
        assert_eq!(watch(&mut tracker, 0, 60), Some(Cue::OneMinute));
        assert_eq!(watch(&mut tracker, 0, 59), None);
        assert_eq!(watch(&mut tracker, 0, 60), None);
    }

    #[test]
    fn skipped_second_still_fires() {
        let mut tracker = CueTracker::new();
        watch(&mut tracker, 0, 61);
        assert_eq!(watch(&mut tracker, 0, 58), Some(Cue::OneMinute));
    }

    #[test]
    fn now_fires_when_start_reached() {
        let mut tracker = CueTracker::new();
        watch(&mut tracker, 3, 1);
        assert_eq!(watch(&mut tracker, 3, 0), Some(Cue::Now));
        assert_eq!(watch(&mut tracker, 3, -1), None);
    }

    #[test]
    fn switching_item_primes_again() {
        let mut tracker = CueTracker::new();
        watch(&mut tracker, 0, 61);
        assert_eq!(watch(&mut tracker, 1, 60), None);
        assert_eq!(watch(&mut tracker, 1, 30), None);
    }

    #[test]
    fn reset_forgets_previous_tick() {
        let mut tracker = CueTracker::new();
        watch(&mut tracker, 0, 61);
        tracker.reset();
        assert_eq!(watch(&mut tracker, 0, 59), None);
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn live_ticks_cue_current_and_next_item() {
        let timeline = Timeline::from_parts(
            Vec::new(),
            vec![
                ScheduledItem::raw(at(9, 0, 0), Duration::minutes(30), "Email"),
                ScheduledItem::raw(at(9, 30, 0), Duration::minutes(30), "Report"),
            ],
        );
        let mut tracker = CueTracker::new();
        let mut fired = Vec::new();

        let mut now = at(8, 58, 50);
        while now <= at(9, 30, 5) {
            let status = timeline.status(now, Duration::minutes(5));
            for (cue, countdown) in tracker.observe(&status.countdowns()) {
                fired.push((now, cue, countdown.description.to_string()));
            }
            now += Duration::seconds(1);
        }

        assert_eq!(
            fired,
            vec![
                (at(8, 59, 0), Cue::OneMinute, "Email".to_string()),
                (at(9, 0, 0), Cue::Now, "Email".to_string()),
                (at(9, 29, 0), Cue::OneMinute, "Report".to_string()),
                (at(9, 30, 0), Cue::Now, "Report".to_string()),
            ]
        );
    }
}
