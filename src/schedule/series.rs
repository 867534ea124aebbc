//! Series termination and occurrence iteration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::occurrence::compute_next_occurrence;
use super::pattern::RecurrencePattern;
use crate::errors::ScheduleError;

/// Date of the `count`-th occurrence after `start`, treating `start` as the
/// first anchor.
pub fn compute_end_date_from_count(
    start: NaiveDate,
    pattern: &RecurrencePattern,
    count: u32,
) -> Result<NaiveDate, ScheduleError> {
    if count == 0 {
        return Err(ScheduleError::ZeroOccurrenceCount);
    }
    let mut date = start;
    for _ in 0..count {
        date = compute_next_occurrence(date, pattern)?;
    }
    Ok(date)
}

/// How a recurring series stops.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SeriesEnd {
    #[default]
    Never,
    OnDate(NaiveDate),
    AfterOccurrences(u32),
}

impl SeriesEnd {
    /// Concrete end date for the series, if it has one.
    pub fn resolve(
        &self,
        start: NaiveDate,
        pattern: &RecurrencePattern,
    ) -> Result<Option<NaiveDate>, ScheduleError> {
        match *self {
            SeriesEnd::Never => Ok(None),
            SeriesEnd::OnDate(end) => Ok(Some(end)),
            SeriesEnd::AfterOccurrences(count) => {
                compute_end_date_from_count(start, pattern, count).map(Some)
            }
        }
    }
}

/// Successive occurrences strictly after an anchor, stopping after `end`.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    pattern: &'a RecurrencePattern,
    cursor: NaiveDate,
    end: Option<NaiveDate>,
    finished: bool,
}

impl<'a> Occurrences<'a> {
    pub fn new(anchor: NaiveDate, pattern: &'a RecurrencePattern, end: Option<NaiveDate>) -> Self {
        Self {
            pattern,
            cursor: anchor,
            end,
            finished: false,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        let next = match compute_next_occurrence(self.cursor, self.pattern) {
            Ok(next) => next,
            Err(err) => {
                warn!(cursor = %self.cursor, error = %err, "occurrence iteration stopped");
                self.finished = true;
                return None;
            }
        };
        if self.end.is_some_and(|end| next > end) {
            self.finished = true;
            return None;
        }
        self.cursor = next;
        Some(next)
    }
}

/// Up to `limit` upcoming occurrences after `anchor`, for previews.
pub fn upcoming(
    anchor: NaiveDate,
    pattern: &RecurrencePattern,
    end: Option<NaiveDate>,
    limit: usize,
) -> Vec<NaiveDate> {
    Occurrences::new(anchor, pattern, end).take(limit).collect()
}
