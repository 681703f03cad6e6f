use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::loader::load_file;
use super::model::{ClassificationColumn, Table};

type LoadFn = Box<dyn Fn() -> anyhow::Result<Table> + Send + Sync>;

// ---------------------------------------------------------------------------
// TableCache – load once, read many
// ---------------------------------------------------------------------------

/// Owns one tabular source and loads it on first access.
///
/// The loaded table is immutable and shared behind an `Arc`. Concurrent first
/// calls to [`TableCache::table`] block on a single load. A failed load is
/// cached as the empty table and is not retried.
pub struct TableCache {
    source: String,
    load: LoadFn,
    table: OnceCell<Arc<Table>>,
}

impl TableCache {
    /// Cache backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>, classification: ClassificationColumn) -> Self {
        let path: PathBuf = path.into();
        let source = path.display().to_string();
        Self::with_loader(source, move || load_file(&path, &classification))
    }

    /// Cache backed by any loader. `source` is only used for messages.
    pub fn with_loader<F>(source: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> anyhow::Result<Table> + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            load: Box::new(load),
            table: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The cached table, loading it on first use. Never fails: an unreadable
    /// source yields [`Table::empty`].
    pub fn table(&self) -> Arc<Table> {
        self.table
            .get_or_init(|| match (self.load)() {
                Ok(table) => {
                    log::info!("Loaded {table} from {}", self.source);
                    Arc::new(table)
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {e:#}", self.source);
                    Arc::new(Table::empty())
                }
            })
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}

impl fmt::Debug for TableCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCache")
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Human-readable name of a source path for the status bar.
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
