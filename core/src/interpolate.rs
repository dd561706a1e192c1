use ordered_float::OrderedFloat;

use crate::buckets::{parse_range_key, RangeBounds};
use crate::types::HcpTargets;

/// Parsed bucket with its midpoint, used as the interpolation support point.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: String,
    pub bounds: RangeBounds,
    pub midpoint: f64,
    pub values: Vec<f64>,
}

/// Parseable buckets sorted by midpoint, ascending.
pub fn build_buckets(targets: &HcpTargets) -> Vec<Bucket> {
    let mut rows: Vec<Bucket> = targets
        .iter()
        .filter_map(|(key, raw)| {
            let bounds = parse_range_key(key)?;
            Some(Bucket {
                key: key.clone(),
                bounds,
                midpoint: bounds.midpoint(),
                values: raw.iter().copied().filter(|v| v.is_finite()).collect(),
            })
        })
        .collect();
    rows.sort_by_key(|b| OrderedFloat(b.midpoint));
    rows
}

/// Thresholds for an arbitrary handicap, linearly interpolated between
/// bucket midpoints and clamped to the outermost buckets.
///
/// Index `i` of the output uses both neighbours when both have a value
/// there, the one that has it otherwise, and NaN when neither does. The
/// output is as long as the longer neighbour.
pub fn interpolate_targets(targets: &HcpTargets, hcp: Option<f64>) -> Vec<f64> {
    let hcp = match hcp {
        Some(h) if h.is_finite() => h,
        _ => return Vec::new(),
    };
    let rows = build_buckets(targets);
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Vec::new(),
    };

    if rows.len() == 1 || hcp <= first.midpoint {
        return first.values.clone();
    }
    if hcp >= last.midpoint {
        return last.values.clone();
    }

    let (a, b) = rows
        .windows(2)
        .find(|w| hcp >= w[0].midpoint && hcp <= w[1].midpoint)
        .map(|w| (&w[0], &w[1]))
        .unwrap_or((&rows[0], &rows[1]));

    let span = b.midpoint - a.midpoint;
    let t = if span > 0.0 { (hcp - a.midpoint) / span } else { 0.0 };

    let len = a.values.len().max(b.values.len());
    (0..len)
        .map(|i| {
            let va = a.values.get(i).copied().filter(|v| v.is_finite());
            let vb = b.values.get(i).copied().filter(|v| v.is_finite());
            match (va, vb) {
                (Some(x), Some(y)) => x + (y - x) * t,
                (Some(x), None) | (None, Some(x)) => x,
                (None, None) => f64::NAN,
            }
        })
        .collect()
}
