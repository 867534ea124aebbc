//! Human-readable descriptions of recurrence patterns for UI badges and
//! notification text.

use std::fmt;

use chrono::Weekday;

use super::pattern::{Cadence, MonthlyRule, RecurrencePattern, WeekOfMonth};

/// Describes `pattern`, e.g. "every 2 weeks on Mon, Wed" or
/// "every month on the last Friday".
pub fn format_pattern(pattern: &RecurrencePattern) -> String {
    let unit = match pattern.cadence() {
        Cadence::Daily => "day",
        Cadence::Weekly { .. } => "week",
        Cadence::Monthly(_) => "month",
        Cadence::Yearly => "year",
    };
    let mut text = match pattern.interval() {
        1 => format!("every {unit}"),
        n => format!("every {n} {unit}s"),
    };
    match pattern.cadence() {
        Cadence::Weekly { days } if !days.is_empty() => {
            let names: Vec<String> = days.iter().map(|day| day.to_string()).collect();
            text.push_str(" on ");
            text.push_str(&names.join(", "));
        }
        Cadence::Monthly(MonthlyRule::ByDate { day }) => {
            text.push_str(&format!(" on the {}", ordinal(*day)));
        }
        Cadence::Monthly(MonthlyRule::ByWeekday { week, weekday }) => {
            let position = match week {
                WeekOfMonth::Last => "last".to_string(),
                other => ordinal(other.index().unsigned_abs().into()),
            };
            text.push_str(&format!(" on the {position} {}", weekday_name(*weekday)));
        }
        _ => {}
    }
    text
}

pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(self))
    }
}
