use chrono::{NaiveDate, Weekday};
use schedule_core::config::ScheduleConfig;
use schedule_core::schedule::{
    DailyDigest, DueStatus, RecurrencePattern, ReminderRule, ScheduledObligation, SeriesEnd,
    WeekOfMonth, WeekStart,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent() -> ScheduledObligation {
    ScheduledObligation::new_recurring(
        "Rent",
        date(2024, 1, 1),
        RecurrencePattern::monthly_by_date(1, 1).unwrap(),
        SeriesEnd::Never,
    )
    .unwrap()
    .with_reminders(vec![ReminderRule::before(3), ReminderRule::on_day()])
}

#[test]
fn cached_next_due_tracks_last_occurrence() {
    let mut obligation = rent();
    for (paid, expected) in [
        (date(2024, 1, 1), date(2024, 2, 1)),
        (date(2024, 2, 1), date(2024, 3, 1)),
        (date(2024, 3, 1), date(2024, 4, 1)),
    ] {
        assert_eq!(obligation.record_occurrence(paid).unwrap(), Some(expected));
        assert_eq!(obligation.last_occurrence_date(), Some(paid));
    }
    // Refreshing without a new occurrence is a no-op.
    assert_eq!(obligation.refresh_next_due().unwrap(), Some(date(2024, 4, 1)));
}

#[test]
fn replacing_pattern_recomputes_next_due() {
    let mut obligation = rent();
    obligation.record_occurrence(date(2024, 3, 1)).unwrap();
    let last_friday =
        RecurrencePattern::monthly_by_weekday(1, WeekOfMonth::Last, Weekday::Fri).unwrap();
    let next = obligation
        .replace_pattern(last_friday, SeriesEnd::OnDate(date(2024, 12, 31)))
        .unwrap();
    assert_eq!(next, Some(date(2024, 3, 29)));
    assert_eq!(obligation.end_date(), Some(date(2024, 12, 31)));
}

#[test]
fn status_and_reminders_follow_today() {
    let mut obligation = rent();
    obligation.record_occurrence(date(2024, 2, 1)).unwrap();

    // Tuesday 2024-02-27, three days before 1 March.
    let today = date(2024, 2, 27);
    assert_eq!(
        obligation.status_on(today, WeekStart::Sunday),
        Some(DueStatus::DueThisWeek)
    );
    let evaluation = obligation.reminders_on(today).unwrap();
    assert_eq!(evaluation.fired_rules, vec![ReminderRule::before(3)]);
    assert!(!evaluation.is_overdue);

    let late = date(2024, 3, 6);
    assert_eq!(
        obligation.status_on(late, WeekStart::Sunday),
        Some(DueStatus::Overdue)
    );
    let evaluation = obligation.reminders_on(late).unwrap();
    assert!(evaluation.is_overdue);
    assert!(evaluation.fired_rules.is_empty());
    assert_eq!(evaluation.days_until, -5);
}

#[test]
fn daily_digest_groups_and_notifies() {
    let today = date(2024, 3, 13);

    let mut overdue = rent();
    overdue.record_occurrence(date(2024, 2, 1)).unwrap();

    let streaming = ScheduledObligation::new_recurring(
        "Streaming",
        date(2024, 3, 16),
        RecurrencePattern::monthly(1).unwrap(),
        SeriesEnd::Never,
    )
    .unwrap()
    .with_reminders(vec![ReminderRule::before(3)]);

    let insurance = ScheduledObligation::new_one_off("Insurance", date(2024, 3, 28))
        .with_reminders(vec![ReminderRule::before(7)]);

    let salary = ScheduledObligation::new_recurring(
        "Salary",
        date(2024, 4, 25),
        RecurrencePattern::monthly_by_date(1, 25).unwrap(),
        SeriesEnd::Never,
    )
    .unwrap();

    let mut finished = ScheduledObligation::new_one_off("Deposit", date(2024, 3, 1));
    finished.record_occurrence(date(2024, 3, 1)).unwrap();

    let obligations = vec![overdue, streaming, insurance, salary, finished];
    let digest = DailyDigest::build(today, &obligations, &ScheduleConfig::default());

    let names = |status| -> Vec<String> {
        digest
            .bucket(status)
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    };
    assert_eq!(names(DueStatus::Overdue), vec!["Rent"]);
    assert!(names(DueStatus::DueToday).is_empty());
    assert_eq!(names(DueStatus::DueThisWeek), vec!["Streaming"]);
    assert_eq!(names(DueStatus::DueThisMonth), vec!["Insurance"]);
    assert_eq!(names(DueStatus::Future), vec!["Salary"]);

    let notified: Vec<_> = digest
        .notifications()
        .iter()
        .map(|n| (n.name.as_str(), n.is_overdue, n.fired_rules.len()))
        .collect();
    assert_eq!(notified, vec![("Rent", true, 0), ("Streaming", false, 1)]);
    assert!(!digest.is_quiet());
}

#[test]
fn obligation_survives_json_round_trip() {
    let mut obligation = rent();
    obligation.record_occurrence(date(2024, 1, 1)).unwrap();
    let json = serde_json::to_string(&obligation).unwrap();
    assert!(json.contains("\"nextDueDate\":\"2024-02-01\""));
    let restored: ScheduledObligation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, obligation);
}

#[test]
fn digest_falls_back_to_configured_reminders() {
    // Wednesday 2024-03-13; neither bill carries its own rules.
    let today = date(2024, 3, 13);
    let water = ScheduledObligation::new_one_off("Water", date(2024, 3, 15));
    let power = ScheduledObligation::new_one_off("Power", date(2024, 3, 18));
    let obligations = vec![water, power];

    let config = ScheduleConfig {
        week_start: WeekStart::Monday,
        default_reminders: vec![ReminderRule::before(2), ReminderRule::before(5)],
        upcoming_limit: 3,
    };
    let digest = DailyDigest::build(today, &obligations, &config);

    let notified: Vec<_> = digest
        .notifications()
        .iter()
        .map(|n| (n.name.as_str(), n.fired_rules.clone()))
        .collect();
    assert_eq!(
        notified,
        vec![
            ("Water", vec![ReminderRule::before(2)]),
            ("Power", vec![ReminderRule::before(5)]),
        ]
    );
    // A Monday week ends on Sunday 03-17, so Monday 03-18 falls outside it.
    assert_eq!(digest.bucket(DueStatus::DueThisWeek).len(), 1);
    assert_eq!(digest.bucket(DueStatus::DueThisMonth).len(), 1);
}

#[test]
fn stale_cached_due_date_is_recomputed_on_load() {
    let mut obligation = rent();
    obligation.record_occurrence(date(2024, 1, 1)).unwrap();
    let json = serde_json::to_string(&obligation)
        .unwrap()
        .replace("\"nextDueDate\":\"2024-02-01\"", "\"nextDueDate\":\"2031-07-19\"");
    assert!(json.contains("2031-07-19"));

    let restored: ScheduledObligation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.next_due_date(), Some(date(2024, 2, 1)));
    assert_eq!(restored, obligation);
}

#[test]
fn stored_record_with_end_before_start_is_rejected() {
    let json = r#"{
        "id": "6f1c3b9e-2a4d-4c8b-9e7f-1a2b3c4d5e6f",
        "name": "Loan",
        "startDate": "2024-05-01",
        "endDate": "2024-04-01",
        "pattern": { "frequency": "monthly", "interval": 1 }
    }"#;
    let err = serde_json::from_str::<ScheduledObligation>(json).unwrap_err();
    assert!(err.to_string().contains("precedes start date"), "{err}");
}
