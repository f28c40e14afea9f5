//! Core domain types for the marathon route ranking engine.
//!
//! The crate models route by metric tables, the "lower is better" direction
//! set, and the ranked output consumed by reports. It also defines the
//! boundary with the GIS metric extraction collaborator, which produces the
//! tables that the ranking engine consumes.
//!
//! Constructors validate their input and return `Result` so malformed tables
//! are rejected when they are loaded rather than while ranking.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod direction;
mod error;
pub mod extraction;
mod merge;
mod ranked;
mod route;
mod scratch;
mod table;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use direction::{DirectionSet, ELEVATION_GAIN, TURN_SHARPNESS};
pub use error::TableError;
pub use extraction::{
    BatchError, BatchOutcome, BufferDistance, BufferError, BufferUnit, ExtractionConfig,
    ExtractionFailure, MetricExtractor, RouteMetrics, STANDARD_METRICS, extract_batch,
};
pub use merge::merge_tables;
pub use ranked::{
    OVERALL_SCORE_COLUMN, RankedRow, RankedTable, WEIGHTED_RANK_SUFFIX, weighted_rank_column,
};
pub use route::{ConnectedRouteMap, ConnectedRouteNotFound, RouteSource};
pub use scratch::{ArtifactCleaner, ScratchArtifacts};
pub use table::{
    DEFAULT_WEIGHT, MetricTable, RouteRow, WEIGHT_ROW, WeightRow, WeightVector, is_weight_key,
};
