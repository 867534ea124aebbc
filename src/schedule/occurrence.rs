//! Next-occurrence computation.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use super::calendar;
use super::pattern::{Cadence, MonthlyRule, RecurrencePattern, WeekOfMonth};
use crate::errors::ScheduleError;

/// Weeks used to measure the weekly interval start on Sunday, matching the
/// weekday index convention.
const INTERVAL_WEEK_START: Weekday = Weekday::Sun;

/// Returns the first occurrence of `pattern` strictly after `anchor`.
///
/// Candidates inside the anchor's own week (weekly with explicit days) or own
/// month (monthly by weekday) are taken when they fall after the anchor;
/// otherwise the pattern jumps `interval` weeks or months ahead. Monthly by
/// date always lands `interval` months after the anchor's month.
pub fn compute_next_occurrence(
    anchor: NaiveDate,
    pattern: &RecurrencePattern,
) -> Result<NaiveDate, ScheduleError> {
    let interval = pattern.interval();
    let next = match pattern.cadence() {
        Cadence::Daily => calendar::add_days(anchor, i64::from(interval))?,
        Cadence::Weekly { days } if days.is_empty() => calendar::add_weeks(anchor, interval)?,
        Cadence::Weekly { days } => next_on_weekdays(anchor, interval, days)?,
        Cadence::Monthly(rule) => next_monthly(anchor, interval, *rule)?,
        Cadence::Yearly => calendar::shift_years(anchor, interval)?,
    };
    debug_assert!(next > anchor);
    debug!(%anchor, %next, frequency = %pattern.frequency(), interval, "computed next occurrence");
    Ok(next)
}

fn next_on_weekdays(
    anchor: NaiveDate,
    interval: u32,
    days: &[Weekday],
) -> Result<NaiveDate, ScheduleError> {
    let anchor_week = calendar::start_of_week(anchor, INTERVAL_WEEK_START);
    let anchor_week_end = calendar::end_of_week(anchor, INTERVAL_WEEK_START);

    let mut candidate = anchor;
    while candidate < anchor_week_end {
        candidate = calendar::add_days(candidate, 1)?;
        if days.contains(&candidate.weekday()) {
            return Ok(candidate);
        }
    }

    // Nothing left in the anchor's week: the next eligible week is `interval`
    // weeks after it, and the earliest selected weekday in it wins.
    let Some(offset) = days.iter().map(|day| calendar::weekday_index(*day)).min() else {
        return calendar::add_weeks(anchor, interval);
    };
    let target_week = calendar::add_weeks(anchor_week, interval)?;
    calendar::add_days(target_week, i64::from(offset))
}

fn next_monthly(
    anchor: NaiveDate,
    interval: u32,
    rule: MonthlyRule,
) -> Result<NaiveDate, ScheduleError> {
    match rule {
        MonthlyRule::AnchorDay => return calendar::shift_months(anchor, interval),
        MonthlyRule::ByDate { .. } => {
            return date_in_month(calendar::month_start_after(anchor, interval)?, rule);
        }
        MonthlyRule::ByWeekday { .. } => {}
    }
    let this_month = date_in_month(calendar::first_of_month(anchor), rule)?;
    if this_month > anchor {
        return Ok(this_month);
    }
    date_in_month(calendar::month_start_after(anchor, interval)?, rule)
}

/// Resolves `rule` inside the month starting at `month_start`.
fn date_in_month(month_start: NaiveDate, rule: MonthlyRule) -> Result<NaiveDate, ScheduleError> {
    match rule {
        MonthlyRule::AnchorDay => Ok(month_start),
        MonthlyRule::ByDate { day } => calendar::clamp_day(month_start, day),
        MonthlyRule::ByWeekday {
            week: WeekOfMonth::Last,
            weekday,
        } => {
            let month_end = calendar::last_of_month(month_start)
                .ok_or_else(|| ScheduleError::DateOutOfRange(month_start.to_string()))?;
            calendar::last_weekday_on_or_before(month_end, weekday)
        }
        MonthlyRule::ByWeekday { week, weekday } => {
            let first = calendar::first_weekday_on_or_after(month_start, weekday)?;
            // Weeks 1-4 always exist: every month holds at least four of each weekday.
            let extra_weeks = u32::try_from(week.index() - 1).unwrap_or(0);
            calendar::add_weeks(first, extra_weeks)
        }
    }
}
