use std::collections::{BTreeMap, HashMap};

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::level::compute_level_for_drill;
use crate::types::{Drill, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BelowTargetRow {
    pub drill_id: String,
    pub title: String,
    pub considered: usize,
    pub below: usize,
    /// 0..=100
    pub pct_below: f64,
}

/// drill id -> drill. Later duplicates win.
pub fn build_drill_map(drills: &[Drill]) -> HashMap<&str, &Drill> {
    drills
        .iter()
        .filter(|d| !d.id.is_empty())
        .map(|d| (d.id.as_str(), d))
        .collect()
}

/// The `n` most recent sessions, newest first. Returns a new vector; the
/// input order is left alone.
pub fn most_recent<'a>(sessions: &[&'a Session], n: usize) -> Vec<&'a Session> {
    let mut recent = sessions.to_vec();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(n);
    recent
}

fn is_below(session: &Session, drill: &Drill, hcp: Option<f64>) -> bool {
    match session.stored_level() {
        Some(level) => level == 0.0,
        None => compute_level_for_drill(drill, hcp, session.result.value) == 0,
    }
}

/// Drills whose recent sessions keep landing on level 0.
///
/// Looks at the last `n` sessions per drill (at least one). Sessions without
/// a stored level are evaluated against the bucket for `hcp`. Sessions for
/// drills missing from the catalog are ignored.
pub fn compute_frequently_below_target(
    sessions: &[Session],
    drills: &[Drill],
    hcp: Option<f64>,
    n: usize,
) -> Vec<BelowTargetRow> {
    if drills.is_empty() {
        return Vec::new();
    }
    let n = n.max(1);

    let mut by_drill: BTreeMap<&str, Vec<&Session>> = BTreeMap::new();
    for s in sessions {
        if s.drill_id.is_empty() || s.date.is_empty() {
            continue;
        }
        by_drill.entry(s.drill_id.as_str()).or_default().push(s);
    }

    let drill_map = build_drill_map(drills);
    let mut rows: Vec<BelowTargetRow> = by_drill
        .into_iter()
        .filter_map(|(drill_id, list)| {
            let drill = drill_map.get(drill_id)?;
            let recent = most_recent(&list, n);
            let considered = recent.len();
            if considered == 0 {
                return None;
            }
            let below = recent.iter().filter(|s| is_below(s, drill, hcp)).count();
            Some(BelowTargetRow {
                drill_id: drill_id.to_string(),
                title: drill.title.clone(),
                considered,
                below,
                pct_below: below as f64 / considered as f64 * 100.0,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        OrderedFloat(b.pct_below)
            .cmp(&OrderedFloat(a.pct_below))
            .then_with(|| b.considered.cmp(&a.considered))
            .then_with(|| a.title.cmp(&b.title))
    });
    rows
}
