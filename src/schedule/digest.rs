//! Daily roll-up consumed by the reminder job.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::obligation::ScheduledObligation;
use super::reminder::{evaluate_reminders, ReminderRule};
use super::status::DueStatus;
use crate::config::ScheduleConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestEntry {
    pub obligation_id: Uuid,
    pub name: String,
    pub due_date: NaiveDate,
}

/// An obligation that should appear in today's outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub obligation_id: Uuid,
    pub name: String,
    pub due_date: NaiveDate,
    pub status: DueStatus,
    pub fired_rules: Vec<ReminderRule>,
    pub is_overdue: bool,
    pub days_until: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDigest {
    pub today: NaiveDate,
    buckets: BTreeMap<DueStatus, Vec<DigestEntry>>,
    notifications: Vec<Notification>,
}

impl DailyDigest {
    /// Classifies every live obligation and collects those needing a
    /// notification today. Terminated series are skipped; obligations
    /// without reminder rules use the configured defaults.
    pub fn build(
        today: NaiveDate,
        obligations: &[ScheduledObligation],
        config: &ScheduleConfig,
    ) -> DailyDigest {
        let mut buckets: BTreeMap<DueStatus, Vec<DigestEntry>> = BTreeMap::new();
        let mut notifications = Vec::new();

        for obligation in obligations {
            let Some(due_date) = obligation.next_due_date() else {
                continue;
            };
            let status = DueStatus::classify(today, due_date, config.week_start);
            buckets.entry(status).or_default().push(DigestEntry {
                obligation_id: obligation.id,
                name: obligation.name.clone(),
                due_date,
            });

            let rules = config.reminders_for(obligation.reminders());
            let evaluation = evaluate_reminders(today, due_date, rules);
            if evaluation.needs_notification() {
                notifications.push(Notification {
                    obligation_id: obligation.id,
                    name: obligation.name.clone(),
                    due_date,
                    status,
                    fired_rules: evaluation.fired_rules,
                    is_overdue: evaluation.is_overdue,
                    days_until: evaluation.days_until,
                });
            }
        }

        for entries in buckets.values_mut() {
            entries.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.name.cmp(&b.name)));
        }
        notifications.sort_by_key(|n| n.due_date);

        info!(
            %today,
            obligations = obligations.len(),
            overdue = buckets.get(&DueStatus::Overdue).map_or(0, Vec::len),
            notifications = notifications.len(),
            "built daily digest"
        );

        DailyDigest {
            today,
            buckets,
            notifications,
        }
    }

    pub fn bucket(&self, status: DueStatus) -> &[DigestEntry] {
        self.buckets.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_quiet(&self) -> bool {
        self.notifications.is_empty()
    }
}
