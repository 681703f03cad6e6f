use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ClassColorMap;
use crate::config::AppConfig;
use crate::data::cache::{source_label, TableCache};
use crate::data::compare::{compare, FilteredTable, Selection};
use crate::data::lookup::{lookup, LookupResult};
use crate::data::model::{ClassificationColumn, Table};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Compare,
    Search,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Source of the table currently shown.
    pub cache: TableCache,

    pub classification: ClassificationColumn,

    /// The loaded table (empty if the source could not be read).
    pub table: Arc<Table>,

    pub tab: Tab,

    /// Antibiotics chosen for comparison, in click order.
    pub selection: Vec<String>,

    /// Text typed into the antibiotic filter box.
    pub antibiotic_query: String,

    /// Comparison view for `selection` (cached, `None` when nothing is selected).
    pub comparison: Option<FilteredTable>,

    /// Bacterium chosen on the search tab.
    pub bacterium: Option<String>,

    /// Text typed into the bacterium search box.
    pub bacterium_query: String,

    /// Lookup result for `bacterium` (cached).
    pub lookup: Option<LookupResult>,

    pub class_colors: ClassColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let cache = TableCache::from_path(&config.data_path, config.classification.clone());
        Self::with_cache(cache, config.classification.clone())
    }

    /// Build the state around an existing cache and load its table.
    pub fn with_cache(cache: TableCache, classification: ClassificationColumn) -> Self {
        let mut state = Self {
            cache,
            classification,
            table: Arc::new(Table::empty()),
            tab: Tab::default(),
            selection: Vec::new(),
            antibiotic_query: String::new(),
            comparison: None,
            bacterium: None,
            bacterium_query: String::new(),
            lookup: None,
            class_colors: ClassColorMap::default(),
            status_message: None,
        };
        state.ingest_table();
        state
    }

    fn ingest_table(&mut self) {
        self.table = self.cache.table();
        self.class_colors = ClassColorMap::new(self.table.classification_labels());
        self.status_message = self
            .table
            .is_empty()
            .then(|| format!("No data available from {}", self.cache.source()));

        // Keep choices that still exist in the new table.
        let table = Arc::clone(&self.table);
        self.selection.retain(|name| table.is_antibiotic(name));
        if self
            .bacterium
            .as_deref()
            .is_some_and(|name| table.find_row(name).is_none())
        {
            self.bacterium = None;
        }
        self.refresh_comparison();
        self.refresh_lookup();
    }

    /// Replace the data source with `path`; the new file is loaded once.
    pub fn open_path(&mut self, path: PathBuf) {
        log::info!("Opening {}", source_label(&path));
        self.cache = TableCache::from_path(path, self.classification.clone());
        self.ingest_table();
    }

    /// Recompute the comparison view from the cached table.
    pub fn refresh_comparison(&mut self) {
        let selection = Selection::resolve(&self.table, &self.selection);
        self.comparison = compare(&self.table, &selection);
        log::debug!(
            "Compared {:?}: {} rows",
            selection.names().collect::<Vec<_>>(),
            self.comparison.as_ref().map_or(0, FilteredTable::len)
        );
    }

    /// Recompute the lookup result from the cached table.
    pub fn refresh_lookup(&mut self) {
        self.lookup = self.bacterium.as_deref().map(|name| lookup(&self.table, name));
    }

    pub fn is_selected(&self, antibiotic: &str) -> bool {
        self.selection.iter().any(|s| s == antibiotic)
    }

    /// Add `antibiotic` at the end of the selection, or remove it if present.
    pub fn toggle_antibiotic(&mut self, antibiotic: &str) {
        if let Some(pos) = self.selection.iter().position(|s| s == antibiotic) {
            self.selection.remove(pos);
        } else if self.table.is_antibiotic(antibiotic) {
            self.selection.push(antibiotic.to_string());
        }
        self.refresh_comparison();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh_comparison();
    }

    pub fn set_bacterium(&mut self, name: Option<String>) {
        self.bacterium = name;
        self.refresh_lookup();
    }

    /// Antibiotic columns whose name contains the filter text (case-insensitive).
    pub fn matching_antibiotics(&self) -> Vec<String> {
        let query = self.antibiotic_query.trim().to_lowercase();
        self.table
            .antibiotic_columns()
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .map(str::to_string)
            .collect()
    }

    /// Identifiers whose name contains the search text (case-insensitive).
    pub fn matching_bacteria(&self) -> Vec<String> {
        let query = self.bacterium_query.trim().to_lowercase();
        self.table
            .identifiers()
            .into_iter()
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .map(str::to_string)
            .collect()
    }

    /// JSON rendering of the active tab's result, for the clipboard.
    pub fn current_view_json(&self) -> Option<String> {
        let json = match self.tab {
            Tab::Compare => serde_json::to_string_pretty(self.comparison.as_ref()?),
            Tab::Search => serde_json::to_string_pretty(self.lookup.as_ref()?),
        };
        match json {
            Ok(s) => Some(s),
            Err(e) => {
                log::error!("Failed to serialise view: {e}");
                None
            }
        }
    }
}
