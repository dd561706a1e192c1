use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::history::HcpHistory;
use crate::interpolate::interpolate_targets;
use crate::level::MAX_LEVEL;
use crate::stats::category_scores::{latest_level_by_drill, latest_session_by_drill};
use crate::trend::moving_average_trend;
use crate::types::{Drill, EvalMode, Level, Session, DEFAULT_STAGNANT_TOLERANCE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaDrill {
    pub id: String,
    pub title: String,
    pub category: String,
    pub latest_level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    pub id: String,
    pub title: String,
    pub category: String,
    pub ma_prev5: Option<f64>,
    pub ma_last5: Option<f64>,
    /// Positive = better, already adjusted for smaller-is-better metrics.
    pub delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreasResult {
    pub below_target: Vec<AreaDrill>,
    pub stagnant: Vec<AreaDrill>,
    pub most_improved: Vec<Improvement>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreasOptions {
    /// Largest |delta| still counted as stagnant.
    pub stagnant_tolerance: f64,
}

impl Default for AreasOptions {
    fn default() -> Self {
        Self {
            stagnant_tolerance: DEFAULT_STAGNANT_TOLERANCE,
        }
    }
}

/// Result values of one drill, oldest first.
fn chronological_values(sessions: &[Session], drill_id: &str) -> Vec<f64> {
    let mut list: Vec<&Session> = sessions.iter().filter(|s| s.drill_id == drill_id).collect();
    list.sort_by(|a, b| a.date.cmp(&b.date));
    list.into_iter().map(|s| s.result.value).collect()
}

/// Where to practise next. Per drill with at least one session:
///
/// - `below_target`: latest level under the target level. The target is the
///   number of interpolated thresholds (max 3) at the latest known handicap
///   (current mode) or the one valid at the latest session (historical),
///   with `user_hcp` as fallback.
/// - `stagnant`: |delta| of the moving averages within the tolerance.
/// - `most_improved`: every drill with a delta, best first.
pub fn compute_areas_of_improvement(
    sessions: &[Session],
    drills: &[Drill],
    user_hcp: Option<f64>,
    mode: EvalMode,
    history: &dyn HcpHistory,
    opts: &AreasOptions,
) -> AreasResult {
    let latest_levels = latest_level_by_drill(sessions, drills, mode, history);
    let latest_sessions = latest_session_by_drill(sessions);

    let mut out = AreasResult::default();

    for drill in drills {
        let Some(latest_session) = latest_sessions.get(drill.id.as_str()) else {
            continue;
        };
        let latest_level = latest_levels.get(&drill.id).copied().unwrap_or(0);

        let hcp = match mode {
            EvalMode::Current => history.latest_hcp(),
            EvalMode::Historical => history.hcp_at(Some(&latest_session.date)),
        }
        .or(user_hcp);

        let target_count = interpolate_targets(drill.targets(), hcp).len();
        let target = target_count.min(usize::from(MAX_LEVEL)) as Level;
        let gap = i16::from(target) - i16::from(latest_level);
        if gap > 0 {
            out.below_target.push(AreaDrill {
                id: drill.id.clone(),
                title: drill.title.clone(),
                category: drill.category.clone(),
                latest_level,
                target_level: Some(target),
                gap: Some(gap),
            });
        }

        let ma = moving_average_trend(&chronological_values(sessions, &drill.id));
        let Some(delta) = ma.delta(drill.smaller_is_better()) else {
            continue;
        };
        if delta.abs() <= opts.stagnant_tolerance {
            out.stagnant.push(AreaDrill {
                id: drill.id.clone(),
                title: drill.title.clone(),
                category: drill.category.clone(),
                latest_level,
                target_level: None,
                gap: None,
            });
        }
        out.most_improved.push(Improvement {
            id: drill.id.clone(),
            title: drill.title.clone(),
            category: drill.category.clone(),
            ma_prev5: ma.ma_prev5,
            ma_last5: ma.ma_last5,
            delta,
        });
    }

    out.below_target.sort_by_key(|a| Reverse(a.gap));
    out.most_improved.sort_by_key(|i| Reverse(OrderedFloat(i.delta)));
    out
}
