use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::{Drill, HcpTargets};

// Hyphen-minus or en dash, one or two ASCII digits on each side.
static RANGE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]{1,2})\s*[-–]\s*([0-9]{1,2})\s*$").expect("range key pattern")
});

/// Inclusive handicap range parsed from a key such as "54-27".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    pub hi: u32,
    pub lo: u32,
}

impl RangeBounds {
    #[inline]
    pub fn width(&self) -> u32 {
        self.hi - self.lo
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (f64::from(self.hi) + f64::from(self.lo)) / 2.0
    }

    #[inline]
    pub fn contains(&self, hcp: f64) -> bool {
        hcp >= f64::from(self.lo) && hcp <= f64::from(self.hi)
    }
}

/// Normalized "{lo}-{hi}" form.
impl fmt::Display for RangeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Display row for the compact targets table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HcpRow {
    pub key: String,
    pub label: String,
    pub values: Vec<f64>,
    pub highlighted: bool,
    pub hi: u32,
    pub lo: u32,
}

/// Parse "54-27", " 12 – 26 " etc. The two numbers may come in either order.
pub fn parse_range_key(key: &str) -> Option<RangeBounds> {
    let caps = RANGE_KEY.captures(key)?;
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    Some(RangeBounds {
        hi: a.max(b),
        lo: a.min(b),
    })
}

/// Key of the bucket containing `hcp`.
///
/// Overlapping buckets resolve to the narrowest one. Equal widths fall back
/// to the lowest `lo`, then to key order, so the answer never depends on
/// how the map was built.
pub fn find_bucket_key(hcp: f64, targets: &HcpTargets) -> Option<&str> {
    if !hcp.is_finite() {
        return None;
    }
    targets
        .keys()
        .filter_map(|key| parse_range_key(key).map(|r| (key.as_str(), r)))
        .filter(|(_, r)| r.contains(hcp))
        .min_by_key(|(key, r)| (r.width(), r.lo, *key))
        .map(|(key, _)| key)
}

/// "26-12" -> "26–12". Does not validate the key.
pub fn format_range_label(key: &str) -> String {
    key.trim().replacen('-', "–", 1)
}

/// One row per parseable key, highest range first.
pub fn build_hcp_rows(targets: &HcpTargets, current_hcp: Option<f64>) -> Vec<HcpRow> {
    let matched = current_hcp.and_then(|h| find_bucket_key(h, targets));

    let mut rows: Vec<HcpRow> = targets
        .iter()
        .filter_map(|(key, values)| {
            let r = parse_range_key(key)?;
            Some(HcpRow {
                key: key.clone(),
                label: format_range_label(key),
                values: values.clone(),
                highlighted: matched == Some(key.as_str()),
                hi: r.hi,
                lo: r.lo,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.hi.cmp(&a.hi).then(b.lo.cmp(&a.lo)));
    rows
}

pub fn build_rows_for_drill(drill: &Drill, current_hcp: Option<f64>) -> Vec<HcpRow> {
    build_hcp_rows(drill.targets(), current_hcp)
}
