/// Data layer: core types, loading, comparison and lookup.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (schema resolved once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  load once, share Arc<Table>
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │ compare   │          │  lookup   │  row-centric coverage
///   └──────────┘          └──────────┘
///        │                      │
///        └──────► category ◄────┘   cell value → COVERED / VARIABLE / NO_DATA
/// ```

pub mod cache;
pub mod category;
pub mod compare;
pub mod loader;
pub mod lookup;
pub mod model;
