use chrono::{TimeZone, Utc};
use parformance_core::achievements::{award_badge, badge_from_session, AchievementKind, BadgeOptions};
use parformance_core::{
    CoreError, Drill, HcpHistoryRow, HcpHistoryStore, HcpTargets, Metric, MetricType, Session,
};

fn drill() -> Drill {
    let targets: HcpTargets = [
        ("54-27".to_string(), vec![2.0, 3.0, 4.0]),
        ("26-12".to_string(), vec![5.0, 7.0, 9.0]),
    ]
    .into_iter()
    .collect();
    Drill::new("ladder", "Putt ladder", "putting", Metric::new(MetricType::Streak, "putts", targets))
}

fn history() -> HcpHistoryStore {
    HcpHistoryStore::from_rows(vec![HcpHistoryRow::new(19.0, "2024-01-01", None)])
}

fn opts() -> BadgeOptions {
    BadgeOptions {
        id: "snap-1".into(),
        criteria_version: "v1".into(),
        ..Default::default()
    }
}

#[test]
fn badge_freezes_level_and_handicap() {
    let when = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let s = Session::new("s1", "ladder", "2024-05-01", 8.0);
    let snap = badge_from_session(&s, Some(&drill()), &history(), opts(), when);

    assert_eq!(snap.level, Some(2));
    assert_eq!(snap.hcp_at_award, Some(19.0));
    assert_eq!(snap.title, "Putt ladder 2★");
    assert_eq!(snap.kind, AchievementKind::Badge);
    assert_eq!(snap.drill_id.as_deref(), Some("ladder"));
    assert_eq!(snap.session_id.as_deref(), Some("s1"));

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["criteriaVersion"], "v1");
    assert_eq!(json["hcp_at_award"], 19.0);
    assert_eq!(json["kind"], "badge");
}

#[test]
fn stored_snapshot_level_wins() {
    let when = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let s = Session::new("s1", "ladder", "2024-05-01", 0.0).with_level(3.0);
    let snap = badge_from_session(&s, Some(&drill()), &history(), opts(), when);
    assert_eq!(snap.level, Some(3));
}

#[test]
fn award_looks_up_the_session() {
    let when = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let sessions = vec![Session::new("s1", "ladder", "2024-05-01", 9.0)];
    let drills = vec![drill()];

    let snap = award_badge("s1", &sessions, &drills, &history(), opts(), when).unwrap();
    assert_eq!(snap.level, Some(3));

    let err = award_badge("nope", &sessions, &drills, &history(), opts(), when).unwrap_err();
    assert!(matches!(err, CoreError::SessionNotFound(id) if id == "nope"));

    let no_id = BadgeOptions::default();
    let err = award_badge("s1", &sessions, &drills, &history(), no_id, when).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn unknown_drill_gets_a_generic_badge() {
    let when = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let s = Session::new("s1", "ghost", "2024-05-01", 9.0);
    let snap = badge_from_session(&s, None, &history(), opts(), when);
    assert_eq!(snap.title, "Badge");
    assert_eq!(snap.level, Some(0));
    assert!(snap.drill_id.is_none());
}
