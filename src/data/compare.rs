use std::collections::BTreeSet;

use serde::Serialize;

use super::category::{categorize, is_empty_cell, CellCategory};
use super::model::Table;

// ---------------------------------------------------------------------------
// Selection: validated, ordered antibiotic columns
// ---------------------------------------------------------------------------

/// An ordered set of antibiotic columns that are known to exist in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    columns: Vec<(String, usize)>,
}

impl Selection {
    /// Keep the names that are antibiotic columns of `table`, in the given
    /// order. Unknown names, non-antibiotic columns and repeats are dropped.
    pub fn resolve<S: AsRef<str>>(table: &Table, names: &[S]) -> Self {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name: &str = name.as_ref();
            if !seen.insert(name) {
                continue;
            }
            match table.column_index(name) {
                Some(idx) if table.is_antibiotic(name) => columns.push((name.to_string(), idx)),
                _ => log::warn!("Ignoring unknown antibiotic column '{name}'"),
            }
        }
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}

// ---------------------------------------------------------------------------
// FilteredTable: the derived comparison view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Identifier,
    Classification,
    Antibiotic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewColumn {
    pub name: String,
    pub role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCell {
    /// Raw cell text; empty for absent cells.
    pub text: String,
    /// Set for antibiotic columns only.
    pub category: Option<CellCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    /// Index of the row in the source table.
    #[serde(skip)]
    pub source_index: usize,
    pub cells: Vec<ViewCell>,
}

/// Rows with coverage among the selected antibiotics, columns in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredTable {
    pub columns: Vec<ViewColumn>,
    pub rows: Vec<ViewRow>,
}

impl FilteredTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the comparison view for `selection`.
///
/// Returns `None` for an empty selection. A row is kept when at least one
/// selected cell has data. Columns are: classification (when the schema has
/// one), identifier, then the selection in its given order.
pub fn compare(table: &Table, selection: &Selection) -> Option<FilteredTable> {
    if selection.is_empty() {
        return None;
    }
    let schema = table.schema();

    let mut layout: Vec<(usize, ColumnRole)> = Vec::with_capacity(selection.len() + 2);
    if let Some(idx) = schema.classification {
        layout.push((idx, ColumnRole::Classification));
    }
    layout.push((schema.identifier, ColumnRole::Identifier));
    layout.extend(
        selection
            .columns
            .iter()
            .map(|(_, idx)| (*idx, ColumnRole::Antibiotic)),
    );

    let columns = layout
        .iter()
        .filter_map(|&(idx, role)| {
            table.columns().get(idx).map(|name| ViewColumn {
                name: name.clone(),
                role,
            })
        })
        .collect();

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            selection
                .columns
                .iter()
                .any(|(_, idx)| !is_empty_cell(row.get(*idx)))
        })
        .map(|(source_index, row)| ViewRow {
            source_index,
            cells: layout
                .iter()
                .map(|&(idx, role)| {
                    let value = row.get(idx);
                    ViewCell {
                        text: value.unwrap_or_default().to_string(),
                        category: (role == ColumnRole::Antibiotic).then(|| categorize(value)),
                    }
                })
                .collect(),
        })
        .collect();

    Some(FilteredTable { columns, rows })
}
