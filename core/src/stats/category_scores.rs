use std::collections::{BTreeMap, HashMap};

use crate::evaluator::evaluate_session_level;
use crate::history::HcpHistory;
use crate::level::MAX_LEVEL;
use crate::types::{Drill, EvalMode, Level, Session};

/// drill id -> category.
pub fn build_drill_category_map(drills: &[Drill]) -> HashMap<&str, &str> {
    drills
        .iter()
        .filter(|d| !d.id.is_empty())
        .map(|d| (d.id.as_str(), d.category.as_str()))
        .collect()
}

/// Latest session (by ISO date) per drill id. On equal dates the first
/// session encountered is kept. Sessions without drill id or date are skipped.
pub fn latest_session_by_drill(sessions: &[Session]) -> BTreeMap<&str, &Session> {
    let mut latest: BTreeMap<&str, &Session> = BTreeMap::new();
    for s in sessions {
        if s.drill_id.is_empty() || s.date.is_empty() {
            continue;
        }
        let newer = latest
            .get(s.drill_id.as_str())
            .map_or(true, |cur| s.date > cur.date);
        if newer {
            latest.insert(s.drill_id.as_str(), s);
        }
    }
    latest
}

/// Level of the latest session per drill id. Sessions whose drill is not in
/// the catalog evaluate to 0.
pub fn latest_level_by_drill(
    sessions: &[Session],
    drills: &[Drill],
    mode: EvalMode,
    history: &dyn HcpHistory,
) -> BTreeMap<String, Level> {
    let by_id: HashMap<&str, &Drill> = drills.iter().map(|d| (d.id.as_str(), d)).collect();
    latest_session_by_drill(sessions)
        .into_iter()
        .map(|(drill_id, s)| {
            let drill = by_id.get(drill_id).copied();
            (drill_id.to_string(), evaluate_session_level(s, drill, mode, history))
        })
        .collect()
}

/// 0..=3 -> 0..=100.
pub fn level_to_pct(level: f64) -> f64 {
    if !level.is_finite() {
        return 0.0;
    }
    let max = f64::from(MAX_LEVEL);
    level.floor().clamp(0.0, max) / max * 100.0
}

/// Mean normalized level of the latest session per drill, grouped by
/// category. Every category in the catalog is present; a category without
/// any sessions scores 0.
pub fn compute_category_scores(
    sessions: &[Session],
    drills: &[Drill],
    mode: EvalMode,
    history: &dyn HcpHistory,
) -> BTreeMap<String, f64> {
    let category_of = build_drill_category_map(drills);
    let latest = latest_level_by_drill(sessions, drills, mode, history);

    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (drill_id, level) in &latest {
        let Some(category) = category_of.get(drill_id.as_str()) else {
            continue;
        };
        let entry = totals.entry(*category).or_insert((0.0, 0));
        entry.0 += level_to_pct(f64::from(*level));
        entry.1 += 1;
    }

    drills
        .iter()
        .map(|d| {
            let score = match totals.get(d.category.as_str()) {
                Some((sum, count)) if *count > 0 => sum / *count as f64,
                _ => 0.0,
            };
            (d.category.clone(), score)
        })
        .collect()
}
