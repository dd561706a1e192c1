use parformance_core::{
    compute_areas_of_improvement, AreasOptions, Drill, EvalMode, FixedHcp, HcpHistoryRow,
    HcpHistoryStore, HcpTargets, Metric, MetricType, Session,
};

fn make_targets(entries: &[(&str, &[f64])]) -> HcpTargets {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect()
}

fn drill(id: &str, targets: HcpTargets, smaller_is_better: bool) -> Drill {
    Drill::new(
        id,
        id.to_uppercase(),
        "practice",
        Metric::new(MetricType::PointsTotal, "points", targets).smaller_is_better(smaller_is_better),
    )
}

fn series(drill_id: &str, values: &[f64]) -> Vec<Session> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Session::new(format!("{drill_id}-{i}"), drill_id, format!("2024-03-{:02}", i + 1), *v))
        .collect()
}

fn fixture() -> (Vec<Drill>, Vec<Session>) {
    let t = make_targets(&[("26-12", &[5.0, 7.0, 9.0])]);
    let drills = vec![
        drill("up", t.clone(), false),
        drill("flat", t.clone(), false),
        drill("par", make_targets(&[("26-12", &[-1.0, 1.0, 3.0])]), true),
        drill("few", t.clone(), false),
        drill("none", t, false),
    ];

    let mut sessions = Vec::new();
    let rising: Vec<f64> = (1..=10).map(f64::from).collect();
    sessions.extend(series("up", &rising));
    sessions.extend(series("flat", &[7.0; 10]));
    sessions.extend(series("par", &[4.0, 4.0, 4.0, 4.0, 4.0, 2.0, 2.0, 2.0, 2.0, 2.0]));
    sessions.extend(series("few", &[0.0, 0.0]));
    // stored out of order on purpose
    sessions.reverse();
    (drills, sessions)
}

#[test]
fn gaps_stagnation_and_improvement() {
    let (drills, sessions) = fixture();
    let res = compute_areas_of_improvement(
        &sessions,
        &drills,
        None,
        EvalMode::Current,
        &FixedHcp(Some(19.0)),
        &AreasOptions::default(),
    );

    let below: Vec<(&str, Option<i16>)> =
        res.below_target.iter().map(|a| (a.id.as_str(), a.gap)).collect();
    assert_eq!(below, [("few", Some(3)), ("par", Some(2)), ("flat", Some(1))]);
    assert!(res.below_target.iter().all(|a| a.target_level == Some(3)));

    let stagnant: Vec<&str> = res.stagnant.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(stagnant, ["flat"]);

    let improved: Vec<(&str, f64)> =
        res.most_improved.iter().map(|i| (i.id.as_str(), i.delta)).collect();
    assert_eq!(improved, [("up", 5.0), ("par", 2.0), ("flat", 0.0)]);
    assert_eq!(res.most_improved[1].ma_prev5, Some(4.0));
    assert_eq!(res.most_improved[1].ma_last5, Some(2.0));
}

#[test]
fn drills_without_sessions_are_skipped() {
    let (drills, sessions) = fixture();
    let res = compute_areas_of_improvement(
        &sessions,
        &drills,
        None,
        EvalMode::Current,
        &FixedHcp(Some(19.0)),
        &AreasOptions::default(),
    );
    assert!(res.below_target.iter().all(|a| a.id != "none"));
    assert!(res.most_improved.iter().all(|i| i.id != "none"));
}

#[test]
fn tolerance_widens_stagnant_set() {
    let (drills, sessions) = fixture();
    let res = compute_areas_of_improvement(
        &sessions,
        &drills,
        None,
        EvalMode::Current,
        &FixedHcp(Some(19.0)),
        &AreasOptions { stagnant_tolerance: 2.5 },
    );
    let stagnant: Vec<&str> = res.stagnant.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(stagnant, ["flat", "par"]);
}

#[test]
fn mode_changes_the_target_level() {
    let targets = make_targets(&[("54-27", &[2.0]), ("26-12", &[5.0, 7.0, 9.0])]);
    let drills = vec![drill("d", targets, false)];
    let sessions = vec![Session::new("s", "d", "2023-06-01", 2.0).with_level(0.0)];
    let history = HcpHistoryStore::from_rows(vec![
        HcpHistoryRow::new(45.0, "2023-01-01", Some("2024-01-01")),
        HcpHistoryRow::new(19.0, "2024-01-01", None),
    ]);
    let opts = AreasOptions::default();

    // 2023: hcp 45 clamps to the 54-27 bucket, which has a single threshold
    let res = compute_areas_of_improvement(&sessions, &drills, None, EvalMode::Historical, &history, &opts);
    assert_eq!(res.below_target[0].target_level, Some(1));
    assert_eq!(res.below_target[0].gap, Some(1));

    let res = compute_areas_of_improvement(&sessions, &drills, None, EvalMode::Current, &history, &opts);
    assert_eq!(res.below_target[0].target_level, Some(3));
    assert_eq!(res.below_target[0].gap, Some(3));
}

#[test]
fn user_handicap_fills_in_for_missing_history() {
    let (drills, sessions) = fixture();
    let empty = HcpHistoryStore::new();
    let opts = AreasOptions::default();

    let res = compute_areas_of_improvement(&sessions, &drills, None, EvalMode::Historical, &empty, &opts);
    assert!(res.below_target.is_empty());

    let res = compute_areas_of_improvement(&sessions, &drills, Some(19.0), EvalMode::Historical, &empty, &opts);
    assert_eq!(res.below_target.len(), 4);
}
