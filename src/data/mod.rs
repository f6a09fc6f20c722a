/// Data layer: core types, loading, reshaping, filtering, and derivation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<WideRecord> (packed measurements)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  explode packed columns → Vec<LongRecord> (runs once)
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  immutable records + unique-value indices
///   └──────────┘
///        │  per filter change
///        ▼
///   ┌──────────┐    ┌──────────┐    ┌──────────┐
///   │  filter   │ ─▶ │ summary  │ +  │  series  │
///   └──────────┘    └──────────┘    └──────────┘
///    view indices    patient cards   chart series
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod series;
pub mod summary;
