//! Handicap-indexed drill evaluation and training statistics.
//!
//! Everything here is a pure function over plain data: drills, sessions and
//! a handicap history passed in by the caller. Storage helpers live in
//! [`storage`]; the Python binding is behind the `python` feature.

pub mod achievements;
pub mod buckets;
pub mod error;
pub mod evaluator;
pub mod filters;
pub mod history;
pub mod interpolate;
pub mod level;
pub mod personal_best;
pub mod report;
pub mod stats;
pub mod storage;
pub mod streaks;
pub mod trend;
pub mod types;
pub mod validation;

#[cfg(feature = "python")]
mod py;

pub use buckets::{build_hcp_rows, find_bucket_key, format_range_label, parse_range_key, HcpRow, RangeBounds};
pub use error::{CoreError, Result};
pub use evaluator::evaluate_session_level;
pub use history::{FixedHcp, HcpFallback, HcpHistory, HcpHistoryStore};
pub use interpolate::interpolate_targets;
pub use level::{compute_level_for_drill, compute_level_from_thresholds, compute_level_reached};
pub use report::{stats_report, stats_report_json, StatsReport};
pub use stats::{
    compute_areas_of_improvement, compute_category_scores, compute_frequently_below_target,
    AreasOptions, AreasResult,
};
pub use storage::{load_drills, load_hcp_history, load_sessions, save_hcp_history, save_sessions};
pub use trend::{moving_average_trend, MovingAverageTrend, Trend};
pub use types::{
    Drill, EvalConfig, EvalMode, HcpHistoryRow, HcpTargets, Level, Metric, MetricType, Session,
    SessionResult,
};
