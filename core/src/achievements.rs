use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::evaluator::evaluate_session_level;
use crate::history::HcpHistory;
use crate::types::{Drill, EvalMode, Level, Session};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    #[default]
    Badge,
    Achievement,
    Manual,
}

/// Frozen award record. It keeps the level and handicap as they were at
/// award time, together with the criteria version used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementSnapshot {
    pub id: String,
    pub kind: AchievementKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub drill_id: Option<String>,
    pub session_id: Option<String>,
    pub level: Option<Level>,
    pub criteria_version: String,
    #[serde(rename = "hcp_at_award")]
    pub hcp_at_award: Option<f64>,
    pub awarded_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct BadgeOptions {
    pub id: String,
    pub criteria_version: String,
    pub kind: Option<AchievementKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: BTreeMap<String, Value>,
}

/// Snapshot for a session, evaluated in historical mode.
pub fn badge_from_session(
    session: &Session,
    drill: Option<&Drill>,
    history: &dyn HcpHistory,
    opts: BadgeOptions,
    awarded_at: DateTime<Utc>,
) -> AchievementSnapshot {
    let level = evaluate_session_level(session, drill, EvalMode::Historical, history);
    let title = opts.title.unwrap_or_else(|| match drill {
        Some(d) => format!("{} {}★", d.title, level),
        None => "Badge".to_string(),
    });

    AchievementSnapshot {
        id: opts.id,
        kind: opts.kind.unwrap_or_default(),
        title,
        description: opts.description,
        drill_id: drill.map(|d| d.id.clone()),
        session_id: Some(session.id.clone()),
        level: Some(level),
        criteria_version: opts.criteria_version,
        hcp_at_award: history.hcp_at(Some(&session.date)),
        awarded_at,
        metadata: opts.metadata,
    }
}

/// Look the session up by id and award it.
pub fn award_badge(
    session_id: &str,
    sessions: &[Session],
    drills: &[Drill],
    history: &dyn HcpHistory,
    opts: BadgeOptions,
    awarded_at: DateTime<Utc>,
) -> Result<AchievementSnapshot> {
    if opts.id.is_empty() {
        return Err(CoreError::Validation("snapshot id required".into()));
    }
    let session = sessions
        .iter()
        .find(|s| s.id == session_id)
        .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;
    let drill = drills.iter().find(|d| d.id == session.drill_id);
    Ok(badge_from_session(session, drill, history, opts, awarded_at))
}
