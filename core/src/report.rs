use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::history::{HcpFallback, HcpHistory, HcpHistoryStore};
use crate::stats::{
    compute_areas_of_improvement, compute_category_scores, compute_frequently_below_target,
    AreasOptions, AreasResult, BelowTargetRow,
};
use crate::storage::{parse_config, parse_drills, parse_hcp_history, parse_sessions};
use crate::streaks::{session_streaks, Streaks};
use crate::types::{Drill, EvalConfig, EvalMode, Session};

/// Everything the stats screen shows, in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub mode: EvalMode,
    pub latest_hcp: Option<f64>,
    pub category_scores: BTreeMap<String, f64>,
    pub frequently_below_target: Vec<BelowTargetRow>,
    pub areas: AreasResult,
    pub streaks: Streaks,
}

/// Builds the stats screen data.
///
/// `cfg.user_hcp` stands in wherever the history has no answer:
/// - levels (category scores, latest level per drill) see the history with
///   `user_hcp` as fallback,
/// - frequently-below-target prefers `user_hcp` over the latest history row,
/// - area targets use the history first, then `user_hcp`.
///
/// `latest_hcp` in the report is the history's own value.
pub fn stats_report(
    drills: &[Drill],
    sessions: &[Session],
    history: &dyn HcpHistory,
    cfg: &EvalConfig,
) -> StatsReport {
    let latest_hcp = history.latest_hcp();
    let below_hcp = cfg.user_hcp.or(latest_hcp);
    let levels = HcpFallback::new(history, cfg.user_hcp);
    let opts = AreasOptions {
        stagnant_tolerance: cfg.stagnant_tolerance,
    };

    StatsReport {
        mode: cfg.mode,
        latest_hcp,
        category_scores: compute_category_scores(sessions, drills, cfg.mode, &levels),
        frequently_below_target: compute_frequently_below_target(
            sessions,
            drills,
            below_hcp,
            cfg.recent_sessions,
        ),
        areas: compute_areas_of_improvement(sessions, drills, cfg.user_hcp, cfg.mode, &levels, &opts),
        streaks: session_streaks(sessions, cfg.as_of.as_deref()),
    }
}

/// JSON in, JSON out. History and config are optional.
pub fn stats_report_json(
    drills_json: &str,
    sessions_json: &str,
    history_json: Option<&str>,
    cfg_json: Option<&str>,
) -> Result<String> {
    let drills = parse_drills(drills_json)?;
    let sessions = parse_sessions(sessions_json)?;
    let history = match history_json {
        Some(raw) => parse_hcp_history(raw)?,
        None => HcpHistoryStore::new(),
    };
    let cfg = match cfg_json {
        Some(raw) => parse_config(raw)?,
        None => EvalConfig::default(),
    };

    let report = stats_report(&drills, &sessions, &history, &cfg);
    serde_json::to_string(&report).map_err(|source| CoreError::Serialize {
        what: "stats report",
        source,
    })
}
