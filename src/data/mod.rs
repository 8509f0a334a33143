/// Data layer: brew records, loading, filtering and summaries.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → BrewLog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ BrewLog   │  Vec<Brew>, facet index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  facets + search + sort → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  per-bean / per-bag summaries
///   └──────────┘
/// ```

pub mod catalog;
pub mod filter;
pub mod loader;
pub mod model;
