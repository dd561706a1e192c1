use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::Drill;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrillFilter {
    pub category: Option<String>,
    /// Case-insensitive substring of the title.
    pub query: Option<String>,
    pub only_favorites: bool,
    pub favorites: Vec<String>,
}

pub fn filter_drills<'a>(drills: &'a [Drill], filter: &DrillFilter) -> Vec<&'a Drill> {
    let query = filter
        .query
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();
    let favorites: HashSet<&str> = filter
        .favorites
        .iter()
        .map(String::as_str)
        .filter(|f| !f.is_empty())
        .collect();
    let category = filter.category.as_deref().filter(|c| !c.is_empty());

    drills
        .iter()
        .filter(|d| category.map_or(true, |c| d.category == c))
        .filter(|d| query.is_empty() || d.title.to_lowercase().contains(&query))
        .filter(|d| !filter.only_favorites || favorites.contains(d.id.as_str()))
        .collect()
}
