//! Scheduling preferences and their JSON persistence.

pub mod manager;

pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};

use crate::schedule::{ReminderRule, WeekStart};

/// Caller-side scheduling preferences, read by the daily digest and by
/// obligation previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    /// Rules applied to obligations created without their own reminders.
    #[serde(default = "ScheduleConfig::default_reminders")]
    pub default_reminders: Vec<ReminderRule>,
    /// Number of occurrences shown in upcoming-payment previews.
    #[serde(default = "ScheduleConfig::default_upcoming_limit")]
    pub upcoming_limit: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            default_reminders: Self::default_reminders(),
            upcoming_limit: Self::default_upcoming_limit(),
        }
    }
}

impl ScheduleConfig {
    pub fn default_reminders() -> Vec<ReminderRule> {
        vec![ReminderRule::before(3), ReminderRule::on_day()]
    }

    pub fn default_upcoming_limit() -> usize {
        12
    }

    /// The obligation's own rules, or `default_reminders` when it has none.
    pub fn reminders_for<'a>(&'a self, rules: &'a [ReminderRule]) -> &'a [ReminderRule] {
        if rules.is_empty() {
            &self.default_reminders
        } else {
            rules
        }
    }
}
