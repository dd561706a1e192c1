// Python binding: thin JSON-in / JSON-out wrappers around the core.
// Built only with `--features python`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::buckets;
use crate::error::CoreError;
use crate::interpolate;
use crate::level;
use crate::report;
use crate::storage::parse_hcp_targets;
use crate::trend;
use crate::types::MetricType;
use crate::validation;

fn to_py_err(e: CoreError) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

#[pyfunction]
#[pyo3(signature = (hcp, hcp_targets_json, value, smaller_is_better = false))]
fn compute_level_reached(
    hcp: Option<f64>,
    hcp_targets_json: &str,
    value: f64,
    smaller_is_better: bool,
) -> PyResult<u8> {
    let targets = parse_hcp_targets(hcp_targets_json).map_err(to_py_err)?;
    Ok(level::compute_level_reached(hcp, &targets, value, smaller_is_better))
}

#[pyfunction]
fn find_bucket_key(hcp: f64, hcp_targets_json: &str) -> PyResult<Option<String>> {
    let targets = parse_hcp_targets(hcp_targets_json).map_err(to_py_err)?;
    Ok(buckets::find_bucket_key(hcp, &targets).map(str::to_string))
}

#[pyfunction]
fn interpolate_targets(hcp_targets_json: &str, hcp: Option<f64>) -> PyResult<Vec<f64>> {
    let targets = parse_hcp_targets(hcp_targets_json).map_err(to_py_err)?;
    Ok(interpolate::interpolate_targets(&targets, hcp))
}

#[pyfunction]
fn moving_average_trend_json(values: Vec<f64>) -> PyResult<String> {
    let out = trend::moving_average_trend(&values);
    serde_json::to_string(&out)
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("serialize trend: {e}")))
}

/// None when valid, otherwise the message to show next to the input.
#[pyfunction]
fn validate_metric_value(metric_type: &str, unit: &str, value: Option<f64>) -> PyResult<Option<String>> {
    let kind = MetricType::parse(metric_type).ok_or_else(|| {
        PyErr::new::<PyValueError, _>(format!("unknown metric type: {metric_type}"))
    })?;
    Ok(validation::validate_metric_value(kind, unit, value)
        .err()
        .map(|e| e.to_string()))
}

#[pyfunction]
#[pyo3(signature = (drills_json, sessions_json, history_json = None, cfg_json = None))]
fn stats_report_json(
    drills_json: &str,
    sessions_json: &str,
    history_json: Option<&str>,
    cfg_json: Option<&str>,
) -> PyResult<String> {
    report::stats_report_json(drills_json, sessions_json, history_json, cfg_json).map_err(to_py_err)
}

#[pymodule]
fn parformance_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_level_reached, m)?)?;
    m.add_function(wrap_pyfunction!(find_bucket_key, m)?)?;
    m.add_function(wrap_pyfunction!(interpolate_targets, m)?)?;
    m.add_function(wrap_pyfunction!(moving_average_trend_json, m)?)?;
    m.add_function(wrap_pyfunction!(validate_metric_value, m)?)?;
    m.add_function(wrap_pyfunction!(stats_report_json, m)?)?;
    Ok(())
}
