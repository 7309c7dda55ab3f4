use chrono::{Local, NaiveDateTime, SubsecRound};

/// Local wall-clock time, whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
