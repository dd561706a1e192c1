use crate::buckets::find_bucket_key;
use crate::types::{Drill, HcpTargets, Level};

pub const MAX_LEVEL: Level = 3;

/// First three entries, finite only, ascending, padded with +inf.
///
/// A padded slot can never be reached by a greater-is-better value, so a
/// bucket with only `[L1]` tops out at level 1.
pub fn normalize_thresholds(raw: &[f64]) -> [f64; 3] {
    let mut thr: Vec<f64> = raw.iter().take(3).copied().filter(|v| v.is_finite()).collect();
    thr.sort_by(|a, b| a.total_cmp(b));

    let mut out = [f64::INFINITY; 3];
    for (slot, v) in out.iter_mut().zip(thr) {
        *slot = v;
    }
    out
}

fn compare(thresholds: [f64; 3], value: f64, smaller_is_better: bool) -> Level {
    let [l1, l2, l3] = thresholds;
    if smaller_is_better {
        if value <= l1 {
            3
        } else if value <= l2 {
            2
        } else if value <= l3 {
            1
        } else {
            0
        }
    } else if value >= l3 {
        3
    } else if value >= l2 {
        2
    } else if value >= l1 {
        1
    } else {
        0
    }
}

/// Level for an already resolved threshold list (bucket values or
/// interpolated values). No usable threshold means level 0.
pub fn compute_level_from_thresholds(thresholds: &[f64], value: f64, smaller_is_better: bool) -> Level {
    if !value.is_finite() {
        return 0;
    }
    let normalized = normalize_thresholds(thresholds);
    if !normalized[0].is_finite() {
        return 0;
    }
    compare(normalized, value, smaller_is_better)
}

/// Level against the discrete bucket that contains `hcp`.
pub fn compute_level_reached(
    hcp: Option<f64>,
    targets: &HcpTargets,
    value: f64,
    smaller_is_better: bool,
) -> Level {
    if !value.is_finite() {
        return 0;
    }
    let thresholds = hcp
        .and_then(|h| find_bucket_key(h, targets))
        .and_then(|key| targets.get(key))
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    compute_level_from_thresholds(thresholds, value, smaller_is_better)
}

pub fn compute_level_for_drill(drill: &Drill, hcp: Option<f64>, value: f64) -> Level {
    compute_level_reached(hcp, drill.targets(), value, drill.smaller_is_better())
}

/// Stored snapshot -> level: floored and clamped to 0..=3.
pub fn clamp_level(raw: f64) -> Level {
    if !raw.is_finite() {
        return 0;
    }
    raw.floor().clamp(0.0, f64::from(MAX_LEVEL)) as Level
}
