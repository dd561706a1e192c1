use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Achievement tier, 0 (not reached) through 3.
pub type Level = u8;

/// Range key ("54-27") -> up to three thresholds, finite numbers only.
pub type HcpTargets = BTreeMap<String, Vec<f64>>;

pub const DEFAULT_RECENT_SESSIONS: usize = 5;
pub const DEFAULT_STAGNANT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Streak,
    CountInTime,
    PointsTotal,
    StationsCleared,
    CorridorHits,
    ScoreVsPar,
}

impl MetricType {
    pub const ALL: [MetricType; 6] = [
        MetricType::Streak,
        MetricType::CountInTime,
        MetricType::PointsTotal,
        MetricType::StationsCleared,
        MetricType::CorridorHits,
        MetricType::ScoreVsPar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Streak => "streak",
            MetricType::CountInTime => "count_in_time",
            MetricType::PointsTotal => "points_total",
            MetricType::StationsCleared => "stations_cleared",
            MetricType::CorridorHits => "corridor_hits",
            MetricType::ScoreVsPar => "score_vs_par",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    #[serde(rename = "type")]
    pub kind: MetricType,
    #[serde(default)]
    pub unit: String,
    #[serde(default, alias = "hcp_targets", deserialize_with = "de_hcp_targets")]
    pub hcp_targets: HcpTargets,
    #[serde(default, alias = "smaller_is_better")]
    pub smaller_is_better: bool,
}

impl Metric {
    pub fn new(kind: MetricType, unit: impl Into<String>, hcp_targets: HcpTargets) -> Self {
        Self {
            kind,
            unit: unit.into(),
            hcp_targets,
            smaller_is_better: false,
        }
    }

    pub fn smaller_is_better(mut self, yes: bool) -> Self {
        self.smaller_is_better = yes;
        self
    }
}

/// Catalog entry. Descriptive sections (equipment, setup, duration,
/// instructions, difficulty) are carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub metric: Metric,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zocker_tip: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Drill {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        metric: Metric,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            metric,
            summary: None,
            tags: Vec::new(),
            variants: Vec::new(),
            zocker_tip: None,
            extra: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn targets(&self) -> &HcpTargets {
        &self.metric.hcp_targets
    }

    #[inline]
    pub fn smaller_is_better(&self) -> bool {
        self.metric.smaller_is_better
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// NaN when the stored value is missing or not numeric.
    #[serde(default = "nan", deserialize_with = "de_lenient_f64")]
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

impl Default for SessionResult {
    fn default() -> Self {
        Self {
            value: f64::NAN,
            unit: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "drill_id")]
    pub drill_id: String,
    /// ISO-8601, compared lexicographically.
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub hcp: Option<f64>,
    #[serde(default)]
    pub result: SessionResult,
    /// Snapshot taken when the session was saved. Never recomputed in
    /// historical mode.
    #[serde(
        default,
        alias = "level_reached",
        deserialize_with = "de_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub level_reached: Option<f64>,
    #[serde(default, alias = "timer_used", skip_serializing_if = "Option::is_none")]
    pub timer_used: Option<f64>,
    /// Dropped (not rejected) when it is not a whole non-negative number.
    #[serde(
        default,
        deserialize_with = "de_opt_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        drill_id: impl Into<String>,
        date: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            drill_id: drill_id.into(),
            date: date.into(),
            hcp: None,
            result: SessionResult {
                value,
                unit: String::new(),
            },
            level_reached: None,
            timer_used: None,
            attempts: None,
            favorited: None,
            notes: None,
        }
    }

    pub fn with_hcp(mut self, hcp: f64) -> Self {
        self.hcp = Some(hcp);
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level_reached = Some(level);
        self
    }

    /// Stored level snapshot, if it is a usable number.
    #[inline]
    pub fn stored_level(&self) -> Option<f64> {
        self.level_reached.filter(|l| l.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HcpHistoryRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// None when the stored value is missing or not numeric; such rows are
    /// kept but never answer a lookup.
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub hcp: Option<f64>,
    #[serde(default)]
    pub valid_from: String,
    /// None (or empty) means open-ended.
    #[serde(default)]
    pub valid_to: Option<String>,
}

impl HcpHistoryRow {
    pub fn new(hcp: f64, valid_from: impl Into<String>, valid_to: Option<&str>) -> Self {
        Self {
            id: None,
            hcp: Some(hcp),
            valid_from: valid_from.into(),
            valid_to: valid_to.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Handicap valid at the session date; stored level snapshots win.
    #[default]
    Historical,
    /// Latest known handicap for every session.
    Current,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub mode: EvalMode,
    pub recent_sessions: usize,
    pub stagnant_tolerance: f64,
    /// Fallback when the handicap history has no answer.
    pub user_hcp: Option<f64>,
    /// Day the current streak is measured against (defaults to today, UTC).
    pub as_of: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            mode: EvalMode::Historical,
            recent_sessions: DEFAULT_RECENT_SESSIONS,
            stagnant_tolerance: DEFAULT_STAGNANT_TOLERANCE,
            user_hcp: None,
            as_of: None,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tolerant number handling at the JSON boundary
// ──────────────────────────────────────────────────────────────────────────────

fn nan() -> f64 {
    f64::NAN
}

/// Finite number from a JSON number or numeric string.
pub fn lenient_number(raw: &Value) -> Option<f64> {
    let x = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Threshold list from a list, a lone scalar or null. Non-numeric entries
/// are dropped.
pub fn finite_numbers(raw: &Value) -> Vec<f64> {
    match raw {
        Value::Array(items) => items.iter().filter_map(lenient_number).collect(),
        Value::Null => Vec::new(),
        other => lenient_number(other).into_iter().collect(),
    }
}

pub fn hcp_targets_from_value(raw: &Value) -> HcpTargets {
    match raw {
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| (key.clone(), finite_numbers(v)))
            .collect(),
        _ => HcpTargets::new(),
    }
}

fn de_hcp_targets<'de, D>(deserializer: D) -> Result<HcpTargets, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(hcp_targets_from_value).unwrap_or_default())
}

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(lenient_number).unwrap_or(f64::NAN))
}

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(lenient_number))
}

fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(lenient_number)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}
