use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::occurrence::compute_next_occurrence;
use super::pattern::RecurrencePattern;
use super::reminder::{evaluate_reminders, ReminderEvaluation, ReminderRule};
use super::series::{upcoming, SeriesEnd};
use super::status::{DueStatus, WeekStart};
use crate::config::ScheduleConfig;
use crate::errors::ScheduleError;

/// The scheduling view of a payment record.
///
/// `next_due_date` is a cache that always equals the next occurrence after
/// `last_occurrence_date` (or `start_date` before anything was recorded),
/// cleared once the series has run past `end_date`. Stored records are
/// re-derived on load, so a stale cached value never survives deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "StoredObligation")]
pub struct ScheduledObligation {
    pub id: Uuid,
    pub name: String,
    start_date: NaiveDate,
    last_occurrence_date: Option<NaiveDate>,
    next_due_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    pattern: Option<RecurrencePattern>,
    reminders: Vec<ReminderRule>,
}

/// Persisted shape of [`ScheduledObligation`], before its cache is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredObligation {
    id: Uuid,
    name: String,
    start_date: NaiveDate,
    #[serde(default)]
    last_occurrence_date: Option<NaiveDate>,
    #[serde(default)]
    next_due_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    pattern: Option<RecurrencePattern>,
    #[serde(default)]
    reminders: Vec<ReminderRule>,
}

impl TryFrom<StoredObligation> for ScheduledObligation {
    type Error = ScheduleError;

    fn try_from(stored: StoredObligation) -> Result<Self, Self::Error> {
        check_end(stored.start_date, stored.end_date)?;
        let mut obligation = Self {
            id: stored.id,
            name: stored.name,
            start_date: stored.start_date,
            last_occurrence_date: stored.last_occurrence_date,
            next_due_date: None,
            end_date: stored.end_date,
            pattern: stored.pattern,
            reminders: stored.reminders,
        };
        let next = obligation.refresh_next_due()?;
        if stored.next_due_date != next {
            warn!(
                obligation = %obligation.id,
                stored = ?stored.next_due_date,
                computed = ?next,
                "replaced stale next due date"
            );
        }
        Ok(obligation)
    }
}

impl ScheduledObligation {
    pub fn new_recurring(
        name: impl Into<String>,
        start_date: NaiveDate,
        pattern: RecurrencePattern,
        end: SeriesEnd,
    ) -> Result<Self, ScheduleError> {
        let end_date = end.resolve(start_date, &pattern)?;
        check_end(start_date, end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            last_occurrence_date: None,
            next_due_date: Some(start_date),
            end_date,
            pattern: Some(pattern),
            reminders: Vec::new(),
        })
    }

    pub fn new_one_off(name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date: due_date,
            last_occurrence_date: None,
            next_due_date: Some(due_date),
            end_date: None,
            pattern: None,
            reminders: Vec::new(),
        }
    }

    pub fn with_reminders(mut self, reminders: Vec<ReminderRule>) -> Self {
        self.reminders = reminders;
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn last_occurrence_date(&self) -> Option<NaiveDate> {
        self.last_occurrence_date
    }

    pub fn next_due_date(&self) -> Option<NaiveDate> {
        self.next_due_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn pattern(&self) -> Option<&RecurrencePattern> {
        self.pattern.as_ref()
    }

    pub fn reminders(&self) -> &[ReminderRule] {
        &self.reminders
    }

    pub fn is_recurring(&self) -> bool {
        self.pattern.is_some()
    }

    /// No further occurrences remain.
    pub fn is_terminated(&self) -> bool {
        self.next_due_date.is_none()
    }

    /// Recomputes the cached next due date from the current anchor.
    pub fn refresh_next_due(&mut self) -> Result<Option<NaiveDate>, ScheduleError> {
        let candidate = match (&self.pattern, self.last_occurrence_date) {
            (_, None) => Some(self.start_date),
            (None, Some(_)) => None,
            (Some(pattern), Some(last)) => Some(compute_next_occurrence(last, pattern)?),
        };
        let end_date = self.end_date;
        self.next_due_date = candidate.filter(|due| end_date.map_or(true, |end| *due <= end));
        if candidate.is_some() && self.next_due_date.is_none() {
            info!(obligation = %self.id, end = ?end_date, "series reached its end date");
        }
        Ok(self.next_due_date)
    }

    /// Records a confirmed occurrence and rolls the next due date forward.
    pub fn record_occurrence(
        &mut self,
        date: NaiveDate,
    ) -> Result<Option<NaiveDate>, ScheduleError> {
        self.last_occurrence_date = Some(date);
        let next = self.refresh_next_due()?;
        debug!(obligation = %self.id, occurred = %date, next = ?next, "recorded occurrence");
        Ok(next)
    }

    /// Replaces the pattern wholesale; the end condition is re-resolved
    /// against the new pattern.
    pub fn replace_pattern(
        &mut self,
        pattern: RecurrencePattern,
        end: SeriesEnd,
    ) -> Result<Option<NaiveDate>, ScheduleError> {
        let end_date = end.resolve(self.start_date, &pattern)?;
        check_end(self.start_date, end_date)?;
        self.pattern = Some(pattern);
        self.end_date = end_date;
        self.refresh_next_due()
    }

    pub fn replace_reminders(&mut self, reminders: Vec<ReminderRule>) {
        self.reminders = reminders;
    }

    pub fn status_on(&self, today: NaiveDate, week_start: WeekStart) -> Option<DueStatus> {
        self.next_due_date
            .map(|due| DueStatus::classify(today, due, week_start))
    }

    pub fn reminders_on(&self, today: NaiveDate) -> Option<ReminderEvaluation> {
        self.next_due_date
            .map(|due| evaluate_reminders(today, due, &self.reminders))
    }

    /// The next due date followed by up to `limit - 1` later occurrences.
    pub fn upcoming(&self, limit: usize) -> Vec<NaiveDate> {
        let Some(next) = self.next_due_date else {
            return Vec::new();
        };
        let mut dates = vec![next];
        if let Some(pattern) = &self.pattern {
            dates.extend(upcoming(next, pattern, self.end_date, limit.saturating_sub(1)));
        }
        dates.truncate(limit);
        dates
    }

    /// [`Self::upcoming`] sized by the configured preview length.
    pub fn preview(&self, config: &ScheduleConfig) -> Vec<NaiveDate> {
        self.upcoming(config.upcoming_limit)
    }
}

fn check_end(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ScheduleError> {
    match end {
        Some(end) if end < start => Err(ScheduleError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}
