use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::HcpHistoryRow;

/// Handicap lookup consumed by session evaluation.
pub trait HcpHistory {
    /// Handicap valid at `iso_date`, if any row covers it.
    fn hcp_at(&self, iso_date: Option<&str>) -> Option<f64>;
    /// Most recent handicap.
    fn latest_hcp(&self) -> Option<f64>;
}

/// In-memory handicap history, always sorted ascending by `valid_from`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HcpHistoryStore {
    rows: Vec<HcpHistoryRow>,
}

// Accepts a bare list of rows or the persisted `{ "rows": [...] }` shape.
// Rows are read straight from the input so a bad row keeps its JSON path.
impl<'de> Deserialize<'de> for HcpHistoryStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = HcpHistoryStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of handicap rows or an object with `rows`")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(row) = seq.next_element::<HcpHistoryRow>()? {
                    rows.push(row);
                }
                Ok(HcpHistoryStore::from_rows(rows))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows: Option<Vec<HcpHistoryRow>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "rows" {
                        rows = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                let rows = rows.ok_or_else(|| de::Error::missing_field("rows"))?;
                Ok(HcpHistoryStore::from_rows(rows))
            }
        }

        deserializer.deserialize_any(StoreVisitor)
    }
}

impl From<Vec<HcpHistoryRow>> for HcpHistoryStore {
    fn from(rows: Vec<HcpHistoryRow>) -> Self {
        Self::from_rows(rows)
    }
}

impl HcpHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<HcpHistoryRow>) -> Self {
        let mut store = Self { rows };
        store.sort();
        store
    }

    /// Insert and re-sort. Rows with equal `valid_from` keep insertion order,
    /// so the later insert wins lookups.
    pub fn add(&mut self, row: HcpHistoryRow) {
        self.rows.push(row);
        self.sort();
    }

    pub fn rows(&self) -> &[HcpHistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn sort(&mut self) {
        self.rows.sort_by(|a, b| a.valid_from.cmp(&b.valid_from));
    }
}

impl HcpHistory for HcpHistoryStore {
    // Scan newest first; overlapping rows resolve to the later `valid_from`.
    // Rows without a usable start date or handicap are skipped.
    fn hcp_at(&self, iso_date: Option<&str>) -> Option<f64> {
        let iso = iso_date.filter(|d| !d.is_empty())?;
        self.rows
            .iter()
            .rev()
            .filter(|r| !r.valid_from.is_empty() && r.hcp.is_some())
            .find(|r| {
                iso >= r.valid_from.as_str()
                    && r
                        .valid_to
                        .as_deref()
                        .map_or(true, |to| to.is_empty() || iso < to)
            })
            .and_then(|r| r.hcp)
    }

    fn latest_hcp(&self) -> Option<f64> {
        self.rows.iter().rev().find_map(|r| r.hcp)
    }
}

/// A single handicap that is valid at every date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedHcp(pub Option<f64>);

impl HcpHistory for FixedHcp {
    fn hcp_at(&self, _iso_date: Option<&str>) -> Option<f64> {
        self.0
    }

    fn latest_hcp(&self) -> Option<f64> {
        self.0
    }
}

/// History lookups with a fixed handicap to fall back on, e.g. the
/// handicap the user typed in when the history has no row for a date.
#[derive(Clone, Copy)]
pub struct HcpFallback<'a> {
    pub history: &'a dyn HcpHistory,
    pub fallback: Option<f64>,
}

impl<'a> HcpFallback<'a> {
    pub fn new(history: &'a dyn HcpHistory, fallback: Option<f64>) -> Self {
        Self { history, fallback }
    }
}

impl HcpHistory for HcpFallback<'_> {
    fn hcp_at(&self, iso_date: Option<&str>) -> Option<f64> {
        self.history.hcp_at(iso_date).or(self.fallback)
    }

    fn latest_hcp(&self) -> Option<f64> {
        self.history.latest_hcp().or(self.fallback)
    }
}
