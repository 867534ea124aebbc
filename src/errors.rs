use std::io;

use chrono::NaiveDate;
use thiserror::Error;

/// Field-combination violations detected while building a [`RecurrencePattern`].
///
/// [`RecurrencePattern`]: crate::schedule::RecurrencePattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),
    #[error("Interval must be at least 1, got {0}")]
    InvalidInterval(i64),
    #[error("Weekday index out of range (0-6): {0}")]
    WeekdayOutOfRange(i64),
    #[error("Duplicate weekday index: {0}")]
    DuplicateWeekday(i64),
    #[error("Unknown monthly type: {0}")]
    UnknownMonthlyType(String),
    #[error("Monthly day is required for by-date recurrences")]
    MissingMonthlyDay,
    #[error("Monthly day out of range (1-31): {0}")]
    MonthlyDayOutOfRange(i64),
    #[error("Monthly week is required for by-weekday recurrences")]
    MissingMonthlyWeek,
    #[error("Monthly week must be 1-4 or -1, got {0}")]
    InvalidMonthlyWeek(i64),
    #[error("Monthly weekday is required for by-weekday recurrences")]
    MissingMonthlyWeekday,
}

/// Error type for scheduling computations and obligation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid recurrence pattern: {0}")]
    Pattern(#[from] PatternError),
    #[error("Occurrence count must be at least 1")]
    ZeroOccurrenceCount,
    #[error("Date out of supported range: {0}")]
    DateOutOfRange(String),
    #[error("End date {end} precedes start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("No configuration directory available on this platform")]
    MissingConfigDir,
}
