use serde::Serialize;

/// Display category of a single antibiotic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellCategory {
    NoData,
    Variable,
    Covered,
}

impl CellCategory {
    pub const ALL: [CellCategory; 3] = [
        CellCategory::Covered,
        CellCategory::Variable,
        CellCategory::NoData,
    ];
}

/// Absent, blank and `none` (any case) cells carry no data.
pub fn is_empty_cell(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v.eq_ignore_ascii_case("none")
        }
    }
}

/// Classify a raw cell value.
pub fn categorize(value: Option<&str>) -> CellCategory {
    match value {
        _ if is_empty_cell(value) => CellCategory::NoData,
        Some(v) if v.trim().eq_ignore_ascii_case("v") => CellCategory::Variable,
        _ => CellCategory::Covered,
    }
}
