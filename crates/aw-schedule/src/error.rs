//! Errors raised lowering a fuzzy schedule/stop-after expression (spec §4.5).

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unrecognized schedule expression '{0}'")]
    Unrecognized(String),

    #[error("'every {0} minutes' is below the 5 minute minimum")]
    IntervalTooShort(u32),

    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTimeOfDay(String),

    #[error("invalid UTC offset '{0}'")]
    InvalidUtcOffset(String),

    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("invalid 'stop-after' expression '{0}'")]
    InvalidStopAfter(String),
}
