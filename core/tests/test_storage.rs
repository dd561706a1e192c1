use std::path::PathBuf;

use parformance_core::storage::{
    latest_session_for_drill, parse_drills, parse_hcp_history, parse_hcp_targets, parse_sessions,
    sessions_for_drill,
};
use parformance_core::{
    load_drills, load_hcp_history, load_sessions, save_hcp_history, save_sessions, CoreError,
    HcpHistory, HcpHistoryRow, HcpHistoryStore, Session,
};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("parformance_storage_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

const DRILLS: &str = r#"[
  {
    "id": "ladder",
    "title": "Putt ladder",
    "category": "putting",
    "metric": {
      "type": "streak",
      "unit": "putts",
      "hcpTargets": { "54-27": [2, 3, 4], "26-12": [5, 7, 9] }
    }
  }
]"#;

#[test]
fn drills_round_trip_through_disk() {
    let path = scratch("drills.json");
    std::fs::write(&path, DRILLS).unwrap();
    let drills = load_drills(&path).unwrap();
    assert_eq!(drills.len(), 1);
    assert_eq!(drills[0].targets()["26-12"], vec![5.0, 7.0, 9.0]);
}

#[test]
fn empty_catalog_is_rejected() {
    let path = scratch("empty_drills.json");
    std::fs::write(&path, "[]").unwrap();
    assert!(matches!(load_drills(&path), Err(CoreError::Validation(_))));
}

#[test]
fn missing_drill_file_is_an_io_error() {
    let err = load_drills(scratch("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }));
}

#[test]
fn missing_stores_start_empty() {
    assert!(load_sessions(scratch("no_sessions.json")).unwrap().is_empty());
    assert!(load_hcp_history(scratch("no_history.json")).unwrap().is_empty());
}

#[test]
fn sessions_and_history_save_and_reload() {
    let sessions = vec![
        Session::new("a", "ladder", "2024-05-01", 4.0).with_level(1.0),
        Session::new("b", "ladder", "2024-05-02", 6.0).with_hcp(18.0),
    ];
    let path = scratch("sessions.json");
    save_sessions(&sessions, &path).unwrap();
    let back = load_sessions(&path).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].stored_level(), Some(1.0));
    assert_eq!(back[1].hcp, Some(18.0));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"drillId\""));
    assert!(raw.contains("\"levelReached\""));

    let history = HcpHistoryStore::from_rows(vec![
        HcpHistoryRow::new(24.0, "2024-01-01", Some("2024-03-01")),
        HcpHistoryRow::new(18.0, "2024-03-01", None),
    ]);
    let path = scratch("history.json");
    save_hcp_history(&history, &path).unwrap();
    let back = load_hcp_history(&path).unwrap();
    assert_eq!(back, history);
    assert_eq!(back.hcp_at(Some("2024-02-01")), Some(24.0));
}

#[test]
fn parse_errors_name_the_failing_path() {
    let raw = r#"[{"id":"a","drillId":"d","date":"2024-05-01","result":{"value":3},"favorited":"yes"}]"#;
    let err = parse_sessions(raw).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("sessions parse at"), "{msg}");
    assert!(msg.contains("favorited"), "{msg}");

    let err = parse_drills(r#"[{"id":"x","metric":{"type":"distance"}}]"#).unwrap_err();
    assert!(matches!(err, CoreError::Parse { what: "drills", .. }), "{err}");
}

#[test]
fn targets_from_loose_json() {
    let t = parse_hcp_targets(r#"{"54-27": [2, "3", null], "11-0": 8}"#).unwrap();
    assert_eq!(t["54-27"], vec![2.0, 3.0]);
    assert_eq!(t["11-0"], vec![8.0]);
    assert!(parse_hcp_targets("{").is_err());
}

#[test]
fn per_drill_queries_are_newest_first() {
    let sessions = vec![
        Session::new("a", "d", "2024-05-01", 1.0),
        Session::new("b", "other", "2024-05-05", 1.0),
        Session::new("c", "d", "2024-05-03", 1.0),
    ];
    let ids: Vec<&str> = sessions_for_drill(&sessions, "d").iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["c", "a"]);
    assert_eq!(latest_session_for_drill(&sessions, "d").map(|s| s.id.as_str()), Some("c"));
    assert!(latest_session_for_drill(&sessions, "none").is_none());
}

#[test]
fn odd_numbers_in_optional_fields_are_tolerated() {
    let raw = r#"[
      {"id":"a","drillId":"d","date":"2024-05-01","result":{"value":3},"attempts":2.5},
      {"id":"b","drillId":"d","date":"2024-05-02","result":{"value":"4"},"attempts":-1}
    ]"#;
    let sessions = parse_sessions(raw).unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.attempts.is_none()));
    assert_eq!(sessions[1].result.value, 4.0);
}

#[test]
fn history_rows_with_bad_handicap_are_kept_but_skipped() {
    let raw = r#"[
      {"hcp":"18","valid_from":"2024-01-01","valid_to":"2024-03-01"},
      {"hcp":20,"valid_from":"2024-03-01","valid_to":"2024-06-01"},
      {"hcp":null,"valid_from":"2024-06-01"}
    ]"#;
    let history = parse_hcp_history(raw).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.hcp_at(Some("2024-02-01")), Some(18.0));
    assert_eq!(history.hcp_at(Some("2024-07-01")), None);
    // the null row never answers, so the latest known value is the 20
    assert_eq!(history.latest_hcp(), Some(20.0));

    let wrapped = parse_hcp_history(r#"{"rows":[{"hcp":"x","valid_from":"2024-01-01"}],"version":2}"#).unwrap();
    assert_eq!(wrapped.latest_hcp(), None);
}

#[test]
fn malformed_history_names_the_failing_row() {
    let err = parse_hcp_history(r#"[{"hcp":18,"valid_from":"2024-01-01"},{"hcp":20,"valid_from":7}]"#)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("hcp_history parse at [1].valid_from"), "{msg}");

    let err = parse_hcp_history(r#"{"rows":[{"hcp":20,"valid_from":false}]}"#).unwrap_err();
    assert!(err.to_string().contains("rows[0].valid_from"), "{err}");

    assert!(parse_hcp_history(r#"{"entries":[]}"#).is_err());
    assert!(parse_hcp_history("18").is_err());
}
