use std::path::PathBuf;

use clap::Parser;

use crate::data::model::ClassificationColumn;

/// Default sheet looked up in the working directory.
pub const DEFAULT_DATA_PATH: &str = "ABO_data.xlsx";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "abo-viewer", version, about = "Antibiotic coverage lookup")]
pub struct Cli {
    /// Bacteria × antibiotic sheet (.xlsx, .csv, .json or .parquet)
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Column holding the classification label (default: column 2 when the sheet has 3+ columns)
    #[arg(long, value_name = "NAME", conflicts_with = "no_classification")]
    pub classification_column: Option<String>,

    /// Treat every column after the identifier as an antibiotic
    #[arg(long)]
    pub no_classification: bool,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub classification: ClassificationColumn,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            classification: ClassificationColumn::Auto,
        }
    }
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let classification = match (cli.classification_column, cli.no_classification) {
            (_, true) => ClassificationColumn::Absent,
            (Some(name), false) => ClassificationColumn::Named(name),
            (None, false) => ClassificationColumn::Auto,
        };
        Self {
            data_path: cli.data,
            classification,
        }
    }
}
