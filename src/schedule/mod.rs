//! Recurrence modeling, occurrence computation, and due-date classification.

pub mod calendar;
pub mod digest;
pub mod format;
pub mod obligation;
pub mod occurrence;
pub mod pattern;
pub mod reminder;
pub mod series;
pub mod status;

pub use digest::{DailyDigest, DigestEntry, Notification};
pub use format::format_pattern;
pub use obligation::ScheduledObligation;
pub use occurrence::compute_next_occurrence;
pub use pattern::{
    Cadence, Frequency, MonthlyRule, RecurrencePattern, RecurrencePatternInput, WeekOfMonth,
};
pub use reminder::{evaluate_reminders, ReminderEvaluation, ReminderKind, ReminderRule};
pub use series::{compute_end_date_from_count, upcoming, Occurrences, SeriesEnd};
pub use status::{DueStatus, WeekStart};
