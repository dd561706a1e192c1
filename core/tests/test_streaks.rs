use parformance_core::streaks::{compute_streaks, day_key, session_streaks, Streaks};
use parformance_core::Session;

const DATES: [&str; 6] = [
    "2024-05-01",
    "2024-05-02T08:00:00Z",
    "2024-05-03",
    "2024-05-05",
    "2024-05-06",
    "2024-05-06T18:30:00",
];

#[test]
fn current_and_best_runs() {
    let s = compute_streaks(DATES, Some("2024-05-06"));
    assert_eq!(s, Streaks { current: 2, best: 3 });
}

#[test]
fn gap_on_reference_day_resets_current() {
    let s = compute_streaks(DATES, Some("2024-05-04"));
    assert_eq!(s.current, 0);
    assert_eq!(s.best, 3);

    let s = compute_streaks(DATES, Some("2024-05-03T21:00:00Z"));
    assert_eq!(s.current, 3);
}

#[test]
fn offsets_are_normalized_to_utc_days() {
    assert_eq!(
        day_key("2024-05-06T23:30:00-02:00").map(|d| d.to_string()),
        Some("2024-05-07".to_string())
    );
    let s = compute_streaks(["2024-05-06", "2024-05-06T23:30:00-02:00"], Some("2024-05-07"));
    assert_eq!(s, Streaks { current: 2, best: 2 });
}

#[test]
fn invalid_and_empty_inputs() {
    assert_eq!(day_key("yesterday"), None);
    let s = compute_streaks(["nope", "2024-05-01"], Some("2024-05-01"));
    assert_eq!(s, Streaks { current: 1, best: 1 });

    assert_eq!(compute_streaks(Vec::<&str>::new(), Some("2024-05-01")), Streaks::default());
    assert_eq!(compute_streaks(DATES, Some("not a date")).current, 0);
}

#[test]
fn streaks_from_sessions() {
    let sessions: Vec<Session> = DATES
        .iter()
        .enumerate()
        .map(|(i, d)| Session::new(i.to_string(), "d", *d, 1.0))
        .collect();
    assert_eq!(session_streaks(&sessions, Some("2024-05-06")).best, 3);
}
