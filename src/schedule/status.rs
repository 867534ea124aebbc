use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::calendar;

/// First day of the calendar week used for the "due this week" bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    pub fn end_of_week(self, date: NaiveDate) -> NaiveDate {
        calendar::end_of_week(date, self.weekday())
    }
}

/// Where an obligation's next due date sits relative to today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum DueStatus {
    Overdue,
    DueToday,
    DueThisWeek,
    DueThisMonth,
    Future,
}

impl DueStatus {
    pub const ALL: [DueStatus; 5] = [
        DueStatus::Overdue,
        DueStatus::DueToday,
        DueStatus::DueThisWeek,
        DueStatus::DueThisMonth,
        DueStatus::Future,
    ];

    /// Buckets `next_due` against `today`. The checks run in bucket order
    /// because the week and month boundaries can coincide.
    pub fn classify(today: NaiveDate, next_due: NaiveDate, week_start: WeekStart) -> DueStatus {
        if next_due < today {
            return DueStatus::Overdue;
        }
        if next_due == today {
            return DueStatus::DueToday;
        }
        if next_due <= week_start.end_of_week(today) {
            return DueStatus::DueThisWeek;
        }
        let month_end = calendar::last_of_month(today).unwrap_or(NaiveDate::MAX);
        if next_due <= month_end {
            DueStatus::DueThisMonth
        } else {
            DueStatus::Future
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DueStatus::Overdue => "Overdue",
            DueStatus::DueToday => "Due today",
            DueStatus::DueThisWeek => "Due this week",
            DueStatus::DueThisMonth => "Due this month",
            DueStatus::Future => "Upcoming",
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
