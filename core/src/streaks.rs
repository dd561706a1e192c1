use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::types::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Consecutive training days ending on the reference day.
    pub current: u32,
    /// Longest run of consecutive training days.
    pub best: u32,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Calendar day (UTC) of an ISO timestamp or date. Timestamps without an
/// offset are taken as UTC.
pub fn day_key(iso: &str) -> Option<NaiveDate> {
    let s = iso.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Current and best day streaks. Unparseable dates are skipped; an
/// unparseable `as_of` yields a current streak of 0. `as_of = None` means
/// today.
pub fn compute_streaks<'a, I>(dates: I, as_of: Option<&str>) -> Streaks
where
    I: IntoIterator<Item = &'a str>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().filter_map(day_key).collect();

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    let reference = match as_of {
        Some(s) => day_key(s),
        None => Some(Utc::now().date_naive()),
    };

    let mut current = 0u32;
    let mut cursor = reference;
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        current += 1;
        cursor = day.pred_opt();
    }

    Streaks { current, best }
}

pub fn session_streaks(sessions: &[Session], as_of: Option<&str>) -> Streaks {
    compute_streaks(sessions.iter().map(|s| s.date.as_str()), as_of)
}
