use serde::Serialize;

use super::category::{categorize, CellCategory};
use super::model::Table;

/// One antibiotic with data for the looked-up bacterium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageEntry {
    pub antibiotic: String,
    pub value: String,
    pub category: CellCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageList {
    pub bacterium: String,
    pub classification: Option<String>,
    /// Antibiotics in source column order; never contains `NoData`.
    pub entries: Vec<CoverageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    /// No row has this identifier.
    NotFound,
    /// The bacterium exists but no antibiotic has data for it.
    NoData { classification: Option<String> },
    Found(CoverageList),
}

/// Row-centric view: which antibiotics have data for `bacterium`.
///
/// Matching is exact and case-sensitive; the first matching row wins.
pub fn lookup(table: &Table, bacterium: &str) -> LookupResult {
    let Some(row) = table.find_row(bacterium) else {
        return LookupResult::NotFound;
    };

    let classification = table
        .schema()
        .classification
        .and_then(|idx| row.get(idx))
        .map(str::to_string);

    let entries: Vec<CoverageEntry> = table
        .schema()
        .antibiotics
        .iter()
        .filter_map(|&idx| {
            let value = row.get(idx);
            let category = categorize(value);
            if category == CellCategory::NoData {
                return None;
            }
            Some(CoverageEntry {
                antibiotic: table.columns()[idx].clone(),
                value: value.unwrap_or_default().to_string(),
                category,
            })
        })
        .collect();

    if entries.is_empty() {
        LookupResult::NoData { classification }
    } else {
        LookupResult::Found(CoverageList {
            bacterium: bacterium.to_string(),
            classification,
            entries,
        })
    }
}
