/// Data layer: core types, loading, filtering, aggregation and chart shapes.
///
/// Architecture:
/// ```text
///  2021.xlsx … 2025.xlsx  (.json / .csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files (one thread each) → RecordStore
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordStore │  Vec<VehicleRecord>, option lists, frozen
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSet predicates → subset (input order)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐      ┌────────┐
///   │ aggregate │ ───▶ │ chart  │  series, scatter points, axis bounds
///   └───────────┘      └────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod filter;
pub mod loader;
pub mod model;
