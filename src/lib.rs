//! Facade crate for the marathon route ranking engine.
//!
//! This crate re-exports the core table types and the ranking engine, and
//! exposes CSV persistence behind the `tables` feature.

#![forbid(unsafe_code)]

pub use marathon_core::{
    DirectionSet, MetricTable, OVERALL_SCORE_COLUMN, RankedRow, RankedTable, TableError,
    WeightRow, merge_tables,
};
pub use marathon_scorer::{
    BaselineComparison, RankingError, apply_direction, compare_to_baseline, max_ranks,
    rank_routes,
};

#[cfg(feature = "tables")]
pub use marathon_data::{
    LoadError, TableLayout, WriteError, read_metric_table, read_metric_tables, write_ranked_file,
    write_ranked_table,
};
