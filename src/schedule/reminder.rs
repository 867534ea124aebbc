//! Reminder rules and the per-day reminder decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::days_between;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ReminderKind {
    /// Fires on the due date itself.
    OnDay,
    /// Fires exactly `days` days before the due date.
    Before,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReminderRule {
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    /// Lead time for [`ReminderKind::Before`]; unused for on-day rules.
    #[serde(default)]
    pub days: u32,
}

impl ReminderRule {
    pub fn on_day() -> Self {
        Self {
            kind: ReminderKind::OnDay,
            days: 0,
        }
    }

    pub fn before(days: u32) -> Self {
        Self {
            kind: ReminderKind::Before,
            days,
        }
    }

    /// Whether the rule fires when the due date is `days_until` days away.
    /// Only an exact match counts.
    pub fn fires(&self, days_until: i64) -> bool {
        match self.kind {
            ReminderKind::OnDay => days_until == 0,
            ReminderKind::Before => days_until == i64::from(self.days),
        }
    }

    pub fn label(&self) -> String {
        match (self.kind, self.days) {
            (ReminderKind::OnDay, _) => "on the due date".into(),
            (ReminderKind::Before, 1) => "1 day before".into(),
            (ReminderKind::Before, n) => format!("{n} days before"),
        }
    }
}

/// Outcome of evaluating an obligation's reminders on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEvaluation {
    pub fired_rules: Vec<ReminderRule>,
    pub is_overdue: bool,
    pub days_until: i64,
}

impl ReminderEvaluation {
    /// Fired rules and overdue state are reported side by side; either one
    /// is enough to notify.
    pub fn needs_notification(&self) -> bool {
        self.is_overdue || !self.fired_rules.is_empty()
    }
}

/// Decides which of `reminders` fire on `today`, in rule order.
pub fn evaluate_reminders(
    today: NaiveDate,
    next_due: NaiveDate,
    reminders: &[ReminderRule],
) -> ReminderEvaluation {
    let days_until = days_between(today, next_due);
    let fired_rules = reminders
        .iter()
        .filter(|rule| rule.fires(days_until))
        .copied()
        .collect();
    ReminderEvaluation {
        fired_rules,
        is_overdue: next_due < today,
        days_until,
    }
}
