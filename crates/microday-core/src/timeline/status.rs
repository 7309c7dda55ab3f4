//! Live status of the cursor item, redrawn on every tick.

use chrono::{Duration, NaiveDateTime};

use super::model::Timeline;

/// What the status line should say at a given moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The cursor item has not started yet.
    Upcoming {
        index: usize,
        description: String,
        starts_in: Duration,
        /// Far enough away that starting right now counts as pulling forward.
        can_start_now: bool,
    },
    /// The cursor item is under way.
    Running {
        index: usize,
        description: String,
        elapsed: Duration,
        next: Option<NextUp>,
    },
    /// Nothing left to do.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextUp {
    pub index: usize,
    pub description: String,
    pub starts_in: Duration,
}

/// An item whose start is being watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown<'a> {
    pub index: usize,
    pub description: &'a str,
    /// Time until the start; zero or negative once the item has begun.
    pub left: Duration,
}

impl Status {
    /// Starts worth cueing: the cursor item, counted through its start,
    /// and while it runs also the item after it.
    pub fn countdowns(&self) -> Vec<Countdown<'_>> {
        match self {
            Self::Upcoming {
                index,
                description,
                starts_in,
                ..
            } => vec![Countdown {
                index: *index,
                description: description.as_str(),
                left: *starts_in,
            }],
            Self::Running {
                index,
                description,
                elapsed,
                next,
            } => {
                let mut countdowns = vec![Countdown {
                    index: *index,
                    description: description.as_str(),
                    left: -*elapsed,
                }];
                if let Some(next) = next {
                    countdowns.push(Countdown {
                        index: next.index,
                        description: next.description.as_str(),
                        left: next.starts_in,
                    });
                }
                countdowns
            }
            Self::Complete => Vec::new(),
        }
    }
}

impl Timeline {
    pub fn status(&self, now: NaiveDateTime, grace: Duration) -> Status {
        let Some(current) = self.current() else {
            return Status::Complete;
        };
        let index = self.cursor();

        if current.start > now {
            let starts_in = current.start - now;
            return Status::Upcoming {
                index,
                description: current.description.clone(),
                starts_in,
                can_start_now: starts_in > grace,
            };
        }

        Status::Running {
            index,
            description: current.description.clone(),
            elapsed: now - current.start,
            next: self.upcoming().map(|next| NextUp {
                index: index + 1,
                description: next.description.clone(),
                starts_in: next.start - now,
            }),
        }
    }
}
