use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors raised while building a table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no columns")]
    NoColumns,
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("classification column '{0}' not found")]
    UnknownClassification(String),
    #[error("classification column '{0}' cannot be the identifier column")]
    ClassificationIsIdentifier(String),
}

// ---------------------------------------------------------------------------
// ClassificationColumn – how the classification role is assigned
// ---------------------------------------------------------------------------

/// Which column (if any) carries the classification label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassificationColumn {
    /// Column 1 is the classification column when the sheet has at least one
    /// antibiotic column after it.
    #[default]
    Auto,
    /// An explicitly named column.
    Named(String),
    /// No classification column; every non-identifier column is an antibiotic.
    Absent,
}

impl ClassificationColumn {
    fn resolve(&self, columns: &[String]) -> Result<Option<usize>, TableError> {
        match self {
            ClassificationColumn::Absent => Ok(None),
            ClassificationColumn::Auto => Ok((columns.len() >= 3).then_some(1)),
            ClassificationColumn::Named(name) => {
                let idx = columns
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| TableError::UnknownClassification(name.clone()))?;
                if idx == 0 {
                    return Err(TableError::ClassificationIsIdentifier(name.clone()));
                }
                Ok(Some(idx))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – column roles, resolved once when the table is built
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// Index of the bacterium identifier column (always 0 for non-empty tables).
    pub identifier: usize,
    /// Index of the classification column, if the source has one.
    pub classification: Option<usize>,
    /// Antibiotic column indices in source order.
    pub antibiotics: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Row – one bacterium
// ---------------------------------------------------------------------------

/// One row of the source sheet. Cells are positional, matching `Table::columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Cell text at `index`; `None` for absent cells and out-of-range indices.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The parsed bacteria × antibiotic sheet with its resolved schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    schema: Schema,
}

impl Table {
    /// The "no data available" sentinel: zero rows, zero columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a header row and positional cell rows.
    ///
    /// Rows shorter than the header are padded with absent cells, longer rows
    /// are truncated. Fully blank rows are dropped.
    pub fn build(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
        classification: &ClassificationColumn,
    ) -> Result<Self, TableError> {
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }

        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(TableError::DuplicateColumn(col.clone()));
            }
        }

        let classification = classification.resolve(&columns)?;
        let antibiotics = (1..columns.len())
            .filter(|i| Some(*i) != classification)
            .collect();
        let schema = Schema {
            identifier: 0,
            classification,
            antibiotics,
        };

        let width = columns.len();
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, None);
                Row::new(cells)
            })
            .filter(|r| !r.is_blank())
            .collect();

        let table = Self {
            columns,
            rows,
            schema,
        };
        table.warn_duplicate_identifiers();
        Ok(table)
    }

    fn warn_duplicate_identifiers(&self) {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for id in self.rows.iter().filter_map(|r| r.get(self.schema.identifier)) {
            *counts.entry(id).or_default() += 1;
        }
        for (id, n) in counts.into_iter().filter(|(_, n)| *n > 1) {
            log::warn!("Identifier '{id}' appears {n} times; lookups use the first row");
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn identifier_column(&self) -> Option<&str> {
        self.columns.get(self.schema.identifier).map(String::as_str)
    }

    pub fn classification_column(&self) -> Option<&str> {
        self.schema
            .classification
            .and_then(|i| self.columns.get(i))
            .map(String::as_str)
    }

    /// Antibiotic column names in source order.
    pub fn antibiotic_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema
            .antibiotics
            .iter()
            .filter_map(|&i| self.columns.get(i))
            .map(String::as_str)
    }

    pub fn is_antibiotic(&self, name: &str) -> bool {
        self.column_index(name)
            .is_some_and(|i| self.schema.antibiotics.contains(&i))
    }

    /// Distinct identifiers in source order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.get(self.schema.identifier))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Distinct classification labels, sorted.
    pub fn classification_labels(&self) -> BTreeSet<&str> {
        match self.schema.classification {
            Some(idx) => self.rows.iter().filter_map(|r| r.get(idx)).collect(),
            None => BTreeSet::new(),
        }
    }

    /// First row whose identifier equals `identifier` exactly.
    pub fn find_row(&self, identifier: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|r| r.get(self.schema.identifier) == Some(identifier))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bacteria × {} antibiotics",
            self.rows.len(),
            self.schema.antibiotics.len()
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn cell(s: &str) -> Option<String> {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    }

    /// Small sheet shaped like the real data: identifier, type, antibiotics.
    pub(crate) fn sample_table() -> Table {
        let columns = ["Bacteria", "Type", "Ampicillin", "Ceftriaxone", "Gentamicin"]
            .map(String::from)
            .to_vec();
        let rows = vec![
            ["E. coli", "Gram Negative", "R", "", "V"],
            ["S. aureus", "Gram Positive", "", "S", "none"],
            ["Mycoplasma", "Atypical", "None", "", ""],
            ["K. pneumoniae", "Gram Negative", "", "", "S"],
        ]
        .into_iter()
        .map(|r| r.iter().map(|s| cell(s)).collect())
        .collect();
        Table::build(columns, rows, &ClassificationColumn::Auto).unwrap()
    }

    #[test]
    fn auto_detects_type_column() {
        let t = sample_table();
        assert_eq!(t.identifier_column(), Some("Bacteria"));
        assert_eq!(t.classification_column(), Some("Type"));
        assert_eq!(
            t.antibiotic_columns().collect::<Vec<_>>(),
            ["Ampicillin", "Ceftriaxone", "Gentamicin"]
        );
    }

    #[test]
    fn auto_uses_column_one_whatever_its_header() {
        let columns = ["Bacteria", "Organism Type", "Ampicillin"].map(String::from).to_vec();
        let t = Table::build(
            columns,
            vec![vec![cell("E. coli"), cell("Gram Negative"), None]],
            &ClassificationColumn::Auto,
        )
        .unwrap();
        assert_eq!(t.classification_column(), Some("Organism Type"));
        assert_eq!(t.antibiotic_columns().collect::<Vec<_>>(), ["Ampicillin"]);
        assert!(!t.is_antibiotic("Organism Type"));
    }

    #[test]
    fn auto_with_two_columns_has_no_classification() {
        let columns = vec!["Organism".to_string(), "Penicillin".to_string()];
        let t = Table::build(columns, vec![vec![cell("GAS"), cell("S")]], &ClassificationColumn::Auto)
            .unwrap();
        assert_eq!(t.classification_column(), None);
        assert_eq!(t.antibiotic_columns().collect::<Vec<_>>(), ["Penicillin"]);
    }

    #[test]
    fn named_and_absent_classification() {
        let columns = ["Bacteria", "Amoxicillin", "Gram"].map(String::from).to_vec();
        let named = Table::build(
            columns.clone(),
            vec![],
            &ClassificationColumn::Named("Gram".into()),
        )
        .unwrap();
        assert_eq!(named.classification_column(), Some("Gram"));
        assert_eq!(named.antibiotic_columns().collect::<Vec<_>>(), ["Amoxicillin"]);

        let absent = Table::build(columns.clone(), vec![], &ClassificationColumn::Absent).unwrap();
        assert_eq!(absent.classification_column(), None);
        assert_eq!(absent.schema().antibiotics, vec![1, 2]);

        assert_eq!(
            Table::build(columns.clone(), vec![], &ClassificationColumn::Named("Nope".into())),
            Err(TableError::UnknownClassification("Nope".into()))
        );
        assert_eq!(
            Table::build(columns, vec![], &ClassificationColumn::Named("Bacteria".into())),
            Err(TableError::ClassificationIsIdentifier("Bacteria".into()))
        );
    }

    #[test]
    fn rejects_duplicate_and_missing_columns() {
        let columns = ["Bacteria", "Ampicillin", "Ampicillin"].map(String::from).to_vec();
        assert_eq!(
            Table::build(columns, vec![], &ClassificationColumn::Auto),
            Err(TableError::DuplicateColumn("Ampicillin".into()))
        );
        assert_eq!(
            Table::build(vec![], vec![], &ClassificationColumn::Auto),
            Err(TableError::NoColumns)
        );
    }

    #[test]
    fn pads_short_rows_and_drops_blank_rows() {
        let columns = ["Bacteria", "Ampicillin", "Gentamicin"].map(String::from).to_vec();
        let rows = vec![vec![cell("E. coli")], vec![None, cell("  ")], vec![]];
        let t = Table::build(columns, rows, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows()[0].get(2), None);
    }

    #[test]
    fn identifiers_and_lookup_row() {
        let t = sample_table();
        assert_eq!(
            t.identifiers(),
            ["E. coli", "S. aureus", "Mycoplasma", "K. pneumoniae"]
        );
        assert!(t.find_row("E. coli").is_some());
        assert!(t.find_row("e. coli").is_none());
        assert!(t.is_antibiotic("Gentamicin"));
        assert!(!t.is_antibiotic("Type"));
        assert!(!t.is_antibiotic("Vancomycin"));
        assert_eq!(
            t.classification_labels().into_iter().collect::<Vec<_>>(),
            ["Atypical", "Gram Negative", "Gram Positive"]
        );
    }

    #[test]
    fn empty_sentinel() {
        let t = Table::empty();
        assert!(t.is_empty());
        assert!(t.columns().is_empty());
        assert_eq!(t.identifier_column(), None);
        assert_eq!(t.antibiotic_columns().count(), 0);
        assert!(t.identifiers().is_empty());
    }
}
