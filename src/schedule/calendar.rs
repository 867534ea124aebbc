//! Day-granularity calendar arithmetic used by the occurrence calculator and
//! the due-status classifier.
//!
//! Weekday indices follow the dashboard convention: `0` is Sunday and `6` is
//! Saturday.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::errors::ScheduleError;

const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEKDAYS_FROM_SUNDAY.get(usize::from(index)).copied()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| out_of_range(date, days, "days"))
}

pub fn add_weeks(date: NaiveDate, weeks: u32) -> Result<NaiveDate, ScheduleError> {
    add_days(date, i64::from(weeks) * 7)
}

/// Shifts by whole months, clamping the day to the end of shorter months.
pub fn shift_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| out_of_range(date, i64::from(months), "months"))
}

/// Shifts by whole years; 29 February clamps to 28 February in common years.
pub fn shift_years(date: NaiveDate, years: u32) -> Result<NaiveDate, ScheduleError> {
    let months = years
        .checked_mul(12)
        .ok_or_else(|| out_of_range(date, i64::from(years), "years"))?;
    shift_months(date, months)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => first_next.pred_opt().map(|last| last.day()),
        // December of the final representable year.
        None => Some(31),
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let last_day = days_in_month(date.year(), date.month())?;
    date.with_day(last_day)
}

/// First day of the month `months` after the month containing `date`.
pub fn month_start_after(date: NaiveDate, months: u32) -> Result<NaiveDate, ScheduleError> {
    shift_months(first_of_month(date), months)
}

/// Places `day` inside the month of `month_start`, clamped to its last day.
pub fn clamp_day(month_start: NaiveDate, day: u32) -> Result<NaiveDate, ScheduleError> {
    let last_day = days_in_month(month_start.year(), month_start.month())
        .ok_or_else(|| ScheduleError::DateOutOfRange(month_start.to_string()))?;
    month_start
        .with_day(day.clamp(1, last_day))
        .ok_or_else(|| ScheduleError::DateOutOfRange(format!("{month_start} day {day}")))
}

pub fn first_weekday_on_or_after(
    date: NaiveDate,
    weekday: Weekday,
) -> Result<NaiveDate, ScheduleError> {
    let offset = (7 + weekday_index(weekday) - weekday_index(date.weekday())) % 7;
    add_days(date, i64::from(offset))
}

pub fn last_weekday_on_or_before(
    date: NaiveDate,
    weekday: Weekday,
) -> Result<NaiveDate, ScheduleError> {
    let offset = (7 + weekday_index(date.weekday()) - weekday_index(weekday)) % 7;
    add_days(date, -i64::from(offset))
}

/// Start of the week containing `date`, for weeks beginning on `first_day`.
pub fn start_of_week(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let delta = (7 + weekday_index(date.weekday()) - weekday_index(first_day)) % 7;
    date.checked_sub_signed(Duration::days(i64::from(delta)))
        .unwrap_or(NaiveDate::MIN)
}

/// Last day of the week containing `date`, saturating at the calendar's end.
pub fn end_of_week(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let delta = (7 + weekday_index(date.weekday()) - weekday_index(first_day)) % 7;
    date.checked_add_signed(Duration::days(i64::from(6 - delta)))
        .unwrap_or(NaiveDate::MAX)
}

fn out_of_range(date: NaiveDate, amount: i64, unit: &str) -> ScheduleError {
    ScheduleError::DateOutOfRange(format!("{date} + {amount} {unit}"))
}
