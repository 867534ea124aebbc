//! Recurrence pattern model and its single validating constructor.
//!
//! Every input source (forms, CSV rows, stored JSON) goes through
//! [`RecurrencePattern::try_from`] on a [`RecurrencePatternInput`], so the rest
//! of the engine only ever sees well-formed patterns.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::calendar::{weekday_from_index, weekday_index};
use crate::errors::PatternError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn parse(value: &str) -> Result<Frequency, PatternError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(PatternError::UnknownFrequency(value.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which occurrence of a weekday inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    pub fn from_index(index: i64) -> Option<WeekOfMonth> {
        match index {
            1 => Some(WeekOfMonth::First),
            2 => Some(WeekOfMonth::Second),
            3 => Some(WeekOfMonth::Third),
            4 => Some(WeekOfMonth::Fourth),
            -1 => Some(WeekOfMonth::Last),
            _ => None,
        }
    }

    /// `1..=4`, or `-1` for the last occurrence.
    pub fn index(self) -> i8 {
        match self {
            WeekOfMonth::First => 1,
            WeekOfMonth::Second => 2,
            WeekOfMonth::Third => 3,
            WeekOfMonth::Fourth => 4,
            WeekOfMonth::Last => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlyRule {
    /// Same day-of-month as the anchor (no monthly type supplied).
    AnchorDay,
    ByDate { day: u32 },
    ByWeekday { week: WeekOfMonth, weekday: Weekday },
}

/// Frequency together with the fields that are relevant to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cadence {
    Daily,
    /// Empty `days` repeats on the anchor's own weekday.
    Weekly { days: Vec<Weekday> },
    Monthly(MonthlyRule),
    Yearly,
}

/// A validated description of how often an obligation repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecurrencePatternInput", into = "RecurrencePatternInput")]
pub struct RecurrencePattern {
    interval: u32,
    cadence: Cadence,
}

impl RecurrencePattern {
    pub fn new(interval: u32, cadence: Cadence) -> Result<RecurrencePattern, PatternError> {
        if interval == 0 {
            return Err(PatternError::InvalidInterval(0));
        }
        let cadence = match cadence {
            Cadence::Weekly { days } => Cadence::Weekly {
                days: normalize_weekdays(days.iter().map(|day| i64::from(weekday_index(*day))))?,
            },
            Cadence::Monthly(MonthlyRule::ByDate { day }) => {
                Cadence::Monthly(MonthlyRule::ByDate {
                    day: validate_monthly_day(i64::from(day))?,
                })
            }
            other => other,
        };
        Ok(RecurrencePattern { interval, cadence })
    }

    pub fn daily(interval: u32) -> Result<RecurrencePattern, PatternError> {
        Self::new(interval, Cadence::Daily)
    }

    pub fn weekly(interval: u32) -> Result<RecurrencePattern, PatternError> {
        Self::new(interval, Cadence::Weekly { days: Vec::new() })
    }

    pub fn weekly_on(interval: u32, days: &[Weekday]) -> Result<RecurrencePattern, PatternError> {
        Self::new(
            interval,
            Cadence::Weekly {
                days: days.to_vec(),
            },
        )
    }

    pub fn monthly(interval: u32) -> Result<RecurrencePattern, PatternError> {
        Self::new(interval, Cadence::Monthly(MonthlyRule::AnchorDay))
    }

    pub fn monthly_by_date(interval: u32, day: u32) -> Result<RecurrencePattern, PatternError> {
        Self::new(interval, Cadence::Monthly(MonthlyRule::ByDate { day }))
    }

    pub fn monthly_by_weekday(
        interval: u32,
        week: WeekOfMonth,
        weekday: Weekday,
    ) -> Result<RecurrencePattern, PatternError> {
        Self::new(
            interval,
            Cadence::Monthly(MonthlyRule::ByWeekday { week, weekday }),
        )
    }

    pub fn yearly(interval: u32) -> Result<RecurrencePattern, PatternError> {
        Self::new(interval, Cadence::Yearly)
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub fn frequency(&self) -> Frequency {
        match self.cadence {
            Cadence::Daily => Frequency::Daily,
            Cadence::Weekly { .. } => Frequency::Weekly,
            Cadence::Monthly(_) => Frequency::Monthly,
            Cadence::Yearly => Frequency::Yearly,
        }
    }
}

/// Flat wire shape used by forms, CSV import, and stored JSON.
///
/// Integers are kept signed so negative or oversized values surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePatternInput {
    pub frequency: String,
    #[serde(default = "RecurrencePatternInput::default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_days: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_week: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_week_day: Option<i64>,
}

impl RecurrencePatternInput {
    pub fn default_interval() -> i64 {
        1
    }
}

impl TryFrom<RecurrencePatternInput> for RecurrencePattern {
    type Error = PatternError;

    fn try_from(input: RecurrencePatternInput) -> Result<Self, Self::Error> {
        let frequency = Frequency::parse(&input.frequency)?;
        let interval = u32::try_from(input.interval)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(PatternError::InvalidInterval(input.interval))?;

        // Fields that do not belong to the active frequency are dropped here.
        let cadence = match frequency {
            Frequency::Daily => Cadence::Daily,
            Frequency::Weekly => Cadence::Weekly {
                days: normalize_weekdays(input.weekly_days.unwrap_or_default())?,
            },
            Frequency::Monthly => Cadence::Monthly(monthly_rule(&input)?),
            Frequency::Yearly => Cadence::Yearly,
        };

        Ok(RecurrencePattern { interval, cadence })
    }
}

impl From<RecurrencePattern> for RecurrencePatternInput {
    fn from(pattern: RecurrencePattern) -> Self {
        let mut input = RecurrencePatternInput {
            frequency: pattern.frequency().as_str().to_string(),
            interval: i64::from(pattern.interval),
            ..RecurrencePatternInput::default()
        };
        match pattern.cadence {
            Cadence::Daily | Cadence::Yearly => {}
            Cadence::Weekly { days } => {
                if !days.is_empty() {
                    input.weekly_days = Some(
                        days.into_iter()
                            .map(|day| i64::from(weekday_index(day)))
                            .collect(),
                    );
                }
            }
            Cadence::Monthly(MonthlyRule::AnchorDay) => {}
            Cadence::Monthly(MonthlyRule::ByDate { day }) => {
                input.monthly_type = Some("byDate".into());
                input.monthly_day = Some(i64::from(day));
            }
            Cadence::Monthly(MonthlyRule::ByWeekday { week, weekday }) => {
                input.monthly_type = Some("byWeekday".into());
                input.monthly_week = Some(i64::from(week.index()));
                input.monthly_week_day = Some(i64::from(weekday_index(weekday)));
            }
        }
        input
    }
}

fn monthly_rule(input: &RecurrencePatternInput) -> Result<MonthlyRule, PatternError> {
    let Some(kind) = input.monthly_type.as_deref() else {
        return Ok(MonthlyRule::AnchorDay);
    };
    let normalized: String = kind
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "bydate" => {
            let day = input.monthly_day.ok_or(PatternError::MissingMonthlyDay)?;
            Ok(MonthlyRule::ByDate {
                day: validate_monthly_day(day)?,
            })
        }
        "byweekday" => {
            let week = input.monthly_week.ok_or(PatternError::MissingMonthlyWeek)?;
            let week = WeekOfMonth::from_index(week).ok_or(PatternError::InvalidMonthlyWeek(week))?;
            let weekday = input
                .monthly_week_day
                .ok_or(PatternError::MissingMonthlyWeekday)?;
            Ok(MonthlyRule::ByWeekday {
                week,
                weekday: weekday_from_raw(weekday)?,
            })
        }
        _ => Err(PatternError::UnknownMonthlyType(kind.to_string())),
    }
}

fn validate_monthly_day(day: i64) -> Result<u32, PatternError> {
    u32::try_from(day)
        .ok()
        .filter(|value| (1..=31).contains(value))
        .ok_or(PatternError::MonthlyDayOutOfRange(day))
}

fn weekday_from_raw(index: i64) -> Result<Weekday, PatternError> {
    u8::try_from(index)
        .ok()
        .and_then(weekday_from_index)
        .ok_or(PatternError::WeekdayOutOfRange(index))
}

/// Validates weekday indices and returns them sorted Sunday-first.
fn normalize_weekdays(
    indices: impl IntoIterator<Item = i64>,
) -> Result<Vec<Weekday>, PatternError> {
    let mut seen = [false; 7];
    for index in indices {
        let weekday = weekday_from_raw(index)?;
        let slot = usize::from(weekday_index(weekday));
        if seen[slot] {
            return Err(PatternError::DuplicateWeekday(index));
        }
        seen[slot] = true;
    }
    Ok(seen
        .iter()
        .enumerate()
        .filter(|(_, present)| **present)
        .filter_map(|(slot, _)| weekday_from_index(slot as u8))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(frequency: &str) -> RecurrencePatternInput {
        RecurrencePatternInput {
            frequency: frequency.into(),
            interval: 1,
            ..RecurrencePatternInput::default()
        }
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let err = RecurrencePattern::try_from(input("fortnightly")).unwrap_err();
        assert_eq!(err, PatternError::UnknownFrequency("fortnightly".into()));
    }

    #[test]
    fn interval_below_one_is_rejected() {
        let mut raw = input("daily");
        raw.interval = 0;
        assert_eq!(
            RecurrencePattern::try_from(raw).unwrap_err(),
            PatternError::InvalidInterval(0)
        );
        assert_eq!(
            RecurrencePattern::daily(0).unwrap_err(),
            PatternError::InvalidInterval(0)
        );
    }

    #[test]
    fn weekly_days_are_sorted_and_checked() {
        let mut raw = input("weekly");
        raw.weekly_days = Some(vec![5, 1, 3]);
        let pattern = RecurrencePattern::try_from(raw).unwrap();
        assert_eq!(
            pattern.cadence(),
            &Cadence::Weekly {
                days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
            }
        );

        let mut duplicate = input("weekly");
        duplicate.weekly_days = Some(vec![1, 1]);
        assert_eq!(
            RecurrencePattern::try_from(duplicate).unwrap_err(),
            PatternError::DuplicateWeekday(1)
        );

        let mut out_of_range = input("weekly");
        out_of_range.weekly_days = Some(vec![7]);
        assert_eq!(
            RecurrencePattern::try_from(out_of_range).unwrap_err(),
            PatternError::WeekdayOutOfRange(7)
        );

        assert_eq!(
            RecurrencePattern::weekly_on(1, &[Weekday::Tue, Weekday::Tue]).unwrap_err(),
            PatternError::DuplicateWeekday(2)
        );
    }

    #[test]
    fn monthly_by_date_requires_valid_day() {
        let mut raw = input("monthly");
        raw.monthly_type = Some("byDate".into());
        assert_eq!(
            RecurrencePattern::try_from(raw.clone()).unwrap_err(),
            PatternError::MissingMonthlyDay
        );
        raw.monthly_day = Some(32);
        assert_eq!(
            RecurrencePattern::try_from(raw.clone()).unwrap_err(),
            PatternError::MonthlyDayOutOfRange(32)
        );
        raw.monthly_day = Some(31);
        assert_eq!(
            RecurrencePattern::try_from(raw).unwrap(),
            RecurrencePattern::monthly_by_date(1, 31).unwrap()
        );
    }

    #[test]
    fn monthly_by_weekday_requires_week_and_weekday() {
        let mut raw = input("monthly");
        raw.monthly_type = Some("by_weekday".into());
        assert_eq!(
            RecurrencePattern::try_from(raw.clone()).unwrap_err(),
            PatternError::MissingMonthlyWeek
        );
        raw.monthly_week = Some(5);
        assert_eq!(
            RecurrencePattern::try_from(raw.clone()).unwrap_err(),
            PatternError::InvalidMonthlyWeek(5)
        );
        raw.monthly_week = Some(-1);
        assert_eq!(
            RecurrencePattern::try_from(raw.clone()).unwrap_err(),
            PatternError::MissingMonthlyWeekday
        );
        raw.monthly_week_day = Some(5);
        assert_eq!(
            RecurrencePattern::try_from(raw).unwrap(),
            RecurrencePattern::monthly_by_weekday(1, WeekOfMonth::Last, Weekday::Fri).unwrap()
        );
    }

    #[test]
    fn irrelevant_fields_are_ignored() {
        let mut raw = input("daily");
        raw.weekly_days = Some(vec![9, 9]);
        raw.monthly_type = Some("nonsense".into());
        let pattern = RecurrencePattern::try_from(raw).unwrap();
        assert_eq!(pattern, RecurrencePattern::daily(1).unwrap());
    }

    #[test]
    fn pattern_serializes_as_flat_camel_case() {
        let pattern =
            RecurrencePattern::monthly_by_weekday(2, WeekOfMonth::Second, Weekday::Tue).unwrap();
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frequency": "monthly",
                "interval": 2,
                "monthlyType": "byWeekday",
                "monthlyWeek": 2,
                "monthlyWeekDay": 2
            })
        );
    }

    #[test]
    fn invalid_json_pattern_fails_to_deserialize() {
        let result: Result<RecurrencePattern, _> =
            serde_json::from_str(r#"{"frequency":"weekly","interval":1,"weeklyDays":[1,1]}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate weekday index"));
    }
}
