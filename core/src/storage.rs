use std::path::Path;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_path_to_error as spte;

use crate::error::{CoreError, Result};
use crate::history::HcpHistoryStore;
use crate::types::{hcp_targets_from_value, Drill, EvalConfig, HcpTargets, Session};

/// Deserialize with the JSON path of the first failure in the error.
pub fn parse_json<T: DeserializeOwned>(raw: &str, what: &'static str) -> Result<T> {
    let mut de = serde_json::Deserializer::from_str(raw);
    spte::deserialize(&mut de).map_err(|e| CoreError::Parse {
        what,
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}

pub fn parse_drills(raw: &str) -> Result<Vec<Drill>> {
    parse_json(raw, "drills")
}

pub fn parse_sessions(raw: &str) -> Result<Vec<Session>> {
    parse_json(raw, "sessions")
}

/// Accepts a bare list of rows or `{ "rows": [...] }`. Rows come back sorted.
pub fn parse_hcp_history(raw: &str) -> Result<HcpHistoryStore> {
    parse_json(raw, "hcp_history")
}

pub fn parse_config(raw: &str) -> Result<EvalConfig> {
    parse_json(raw, "config")
}

pub fn parse_hcp_targets(raw: &str) -> Result<HcpTargets> {
    let value: serde_json::Value = parse_json(raw, "hcpTargets")?;
    Ok(hcp_targets_from_value(&value))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path, what: &'static str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| CoreError::Serialize { what, source })?;
    std::fs::write(path, json).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Drill catalog from disk. An empty catalog is an error.
pub fn load_drills(path: impl AsRef<Path>) -> Result<Vec<Drill>> {
    let path = path.as_ref();
    let drills = parse_drills(&read(path)?)?;
    if drills.is_empty() {
        return Err(CoreError::Validation(format!(
            "no drills found in {}",
            path.display()
        )));
    }
    info!("📂 {} drill(s) loaded from {}", drills.len(), path.display());
    Ok(drills)
}

/// Sessions from disk. A missing file is an empty store.
pub fn load_sessions(path: impl AsRef<Path>) -> Result<Vec<Session>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("⚠️ no sessions at {}, starting empty", path.display());
        return Ok(Vec::new());
    }
    let sessions = parse_sessions(&read(path)?)?;
    info!("📂 {} session(s) loaded from {}", sessions.len(), path.display());
    Ok(sessions)
}

pub fn save_sessions(sessions: &[Session], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_pretty(sessions, path, "sessions")?;
    info!("✅ {} session(s) saved to {}", sessions.len(), path.display());
    Ok(())
}

/// Handicap history from disk. A missing file is an empty history.
pub fn load_hcp_history(path: impl AsRef<Path>) -> Result<HcpHistoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("⚠️ no handicap history at {}, starting empty", path.display());
        return Ok(HcpHistoryStore::new());
    }
    let history = parse_hcp_history(&read(path)?)?;
    info!("📂 {} handicap row(s) loaded from {}", history.len(), path.display());
    Ok(history)
}

pub fn save_hcp_history(history: &HcpHistoryStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_pretty(history, path, "hcp_history")?;
    info!("✅ {} handicap row(s) saved to {}", history.len(), path.display());
    Ok(())
}

/// Sessions of one drill, most recent first.
pub fn sessions_for_drill<'a>(sessions: &'a [Session], drill_id: &str) -> Vec<&'a Session> {
    let mut list: Vec<&Session> = sessions.iter().filter(|s| s.drill_id == drill_id).collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    list
}

pub fn latest_session_for_drill<'a>(sessions: &'a [Session], drill_id: &str) -> Option<&'a Session> {
    sessions_for_drill(sessions, drill_id).into_iter().next()
}
