use serde_json::{Map, Value};
use thiserror::Error;

use crate::buckets::parse_range_key;
use crate::types::{Drill, MetricType};

/// Why a user-entered metric value was rejected. Messages carry the unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricValueError {
    #[error("{unit} is required")]
    Missing { unit: String },
    #[error("{unit} must be a whole number (e.g. -3, 0, 2)")]
    NotWholeScore { unit: String },
    #[error("{unit} must be a whole number")]
    NotWhole { unit: String },
    #[error("{unit} must be > 0")]
    NotPositive { unit: String },
    #[error("{unit} must be ≥ 0")]
    Negative { unit: String },
}

/// Raw form input -> number. Empty input is "no value".
pub fn parse_metric_input(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// All metrics are whole numbers. Streaks and timed counts must be
/// positive, other counts non-negative, score vs par may be anything.
pub fn validate_metric_value(
    kind: MetricType,
    unit: &str,
    value: Option<f64>,
) -> Result<(), MetricValueError> {
    let unit = unit.to_string();
    let Some(v) = value.filter(|v| !v.is_nan()) else {
        return Err(MetricValueError::Missing { unit });
    };

    if !v.is_finite() || v.fract() != 0.0 {
        return Err(match kind {
            MetricType::ScoreVsPar => MetricValueError::NotWholeScore { unit },
            _ => MetricValueError::NotWhole { unit },
        });
    }

    match kind {
        MetricType::Streak | MetricType::CountInTime if v <= 0.0 => {
            Err(MetricValueError::NotPositive { unit })
        }
        MetricType::PointsTotal | MetricType::StationsCleared | MetricType::CorridorHits
            if v < 0.0 =>
        {
            Err(MetricValueError::Negative { unit })
        }
        _ => Ok(()),
    }
}

pub fn validate_drill_result(drill: &Drill, value: Option<f64>) -> Result<(), MetricValueError> {
    validate_metric_value(drill.metric.kind, &drill.metric.unit, value)
}

fn non_empty_str(v: Option<&Value>) -> bool {
    v.and_then(Value::as_str).map_or(false, |s| !s.trim().is_empty())
}

fn is_string_list(v: &Value) -> bool {
    v.as_array().map_or(false, |a| a.iter().all(Value::is_string))
}

fn finite_list(v: &Value) -> bool {
    v.as_array().map_or(false, |a| {
        !a.is_empty() && a.iter().all(|x| x.as_f64().map_or(false, f64::is_finite))
    })
}

fn section<'a>(d: &'a Map<String, Value>, name: &str, where_: &str) -> Result<&'a Map<String, Value>, String> {
    d.get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| format!("{where_}: {name} must be object"))
}

fn optional_str(sec: &Map<String, Value>, name: &str, path: &str, where_: &str) -> Result<(), String> {
    match sec.get(name) {
        Some(v) if !non_empty_str(Some(v)) => Err(format!("{where_}: {path}.{name} must be string")),
        _ => Ok(()),
    }
}

fn optional_number(sec: &Map<String, Value>, name: &str, path: &str, where_: &str) -> Result<(), String> {
    match sec.get(name) {
        Some(v) if !v.is_number() => Err(format!("{where_}: {path}.{name} must be number")),
        _ => Ok(()),
    }
}

fn optional_strings(sec: &Map<String, Value>, name: &str, path: &str, where_: &str) -> Result<(), String> {
    match sec.get(name) {
        Some(v) if !is_string_list(v) => Err(format!("{where_}: {path}{name} must be string[]")),
        _ => Ok(()),
    }
}

/// Structural check of one raw catalog record, before typed parsing.
/// Returns the first problem found, prefixed with the record position.
pub fn validate_drill_value(raw: &Value, index: usize) -> Result<(), String> {
    let id_hint = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    let where_ = format!("drill #{index}{id_hint}");
    let w = where_.as_str();

    let d = raw.as_object().ok_or_else(|| format!("{w}: not an object"))?;
    for field in ["id", "title", "category"] {
        if !non_empty_str(d.get(field)) {
            return Err(format!("{w}: missing {field}"));
        }
    }

    let equipment = section(d, "equipment", w)?;
    optional_number(equipment, "balls", "equipment", w)?;
    optional_strings(equipment, "clubs", "equipment.", w)?;
    optional_strings(equipment, "other", "equipment.", w)?;

    let setup = section(d, "setup", w)?;
    if !non_empty_str(setup.get("schema")) {
        return Err(format!("{w}: setup.schema required"));
    }
    optional_str(setup, "diagram", "setup", w)?;
    optional_str(setup, "location", "setup", w)?;

    let duration = section(d, "duration", w)?;
    for name in ["suggestedMin", "hardStop", "timerPreset"] {
        optional_number(duration, name, "duration", w)?;
    }

    let instructions = section(d, "instructions", w)?;
    if !non_empty_str(instructions.get("training")) {
        return Err(format!("{w}: instructions.training required"));
    }
    optional_str(instructions, "test", "instructions", w)?;
    optional_str(instructions, "tooEasy", "instructions", w)?;

    let metric = section(d, "metric", w)?;
    let known_type = metric
        .get("type")
        .and_then(Value::as_str)
        .and_then(MetricType::parse)
        .is_some();
    if !known_type {
        return Err(format!("{w}: metric.type invalid"));
    }
    if !non_empty_str(metric.get("unit")) {
        return Err(format!("{w}: metric.unit required"));
    }
    let targets = metric
        .get("hcpTargets")
        .and_then(Value::as_object)
        .ok_or_else(|| format!("{w}: metric.hcpTargets must be object"))?;
    if targets.is_empty() {
        return Err(format!("{w}: metric.hcpTargets must have at least one bucket"));
    }
    for (bucket, arr) in targets {
        if parse_range_key(bucket).is_none() {
            return Err(format!("{w}: hcpTargets key '{bucket}' is not a range like 54-27"));
        }
        if !finite_list(arr) {
            return Err(format!("{w}: hcpTargets['{bucket}'] must be number[]"));
        }
    }

    optional_strings(d, "tags", "", w)?;
    optional_strings(d, "variants", "", w)?;

    Ok(())
}
