//! Persistence for the marathon route ranking engine.
//!
//! Responsibilities:
//! - Load CSV metric tables in either orientation and merge several of them.
//! - Write ranked tables and extracted metric batches back to CSV.
//! - Read the route registry and the connected-route mapping that drive
//!   metric extraction.
//! - Release scratch artefacts left on disk by extraction.
//!
//! Boundaries:
//! - Ranking rules live in `marathon-scorer`; table semantics live in
//!   `marathon-core`.
//! - All file access goes through `marathon-fs`.

#![forbid(unsafe_code)]

mod cleaner;
mod connected;
mod error;
mod layout;
mod reader;
mod registry;
mod writer;

pub use cleaner::FsArtifactCleaner;
pub use connected::{parse_connected_routes, read_connected_routes};
pub use error::{LoadError, MappingError, RegistryError, WriteError};
pub use layout::{TableLayout, UnknownLayout};
pub use reader::{parse_metric_table, read_metric_table, read_metric_tables};
pub use registry::{parse_route_registry, read_route_registry};
pub use writer::{
    ROUTE_HEADER, write_metric_file, write_metric_table, write_ranked_file, write_ranked_table,
};
