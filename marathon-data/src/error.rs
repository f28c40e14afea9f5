//! Errors raised while reading and writing persisted tables.

use std::io;

use camino::Utf8PathBuf;
use marathon_core::TableError;
use thiserror::Error;

/// Errors returned when loading metric tables.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No table paths were supplied.
    #[error("no metric tables were supplied")]
    NoInput,
    /// The file could not be opened or read.
    #[error("failed to read metric table {path}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
        /// Table that was being read.
        path: Utf8PathBuf,
    },
    /// The file does not describe a route by metric table.
    #[error("metric table {path} is malformed: {source}")]
    Malformed {
        /// What was wrong with the table.
        #[source]
        source: TableError,
        /// Table that was being parsed.
        path: Utf8PathBuf,
    },
    /// Merging the loaded tables failed.
    #[error("failed to merge metric tables")]
    Merge {
        /// Underlying merge failure.
        #[source]
        source: TableError,
    },
}

/// Errors returned when persisting tables.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The output file could not be created.
    #[error("failed to create {path}")]
    Create {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
        /// Destination path.
        path: Utf8PathBuf,
    },
    /// Encoding or flushing CSV output failed.
    #[error("failed to write CSV to {path}")]
    Encode {
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
        /// Destination path.
        path: Utf8PathBuf,
    },
}

/// Errors returned when reading the route registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read route registry {path}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
        /// Registry path.
        path: Utf8PathBuf,
    },
    /// A registry line is not `name,path`.
    #[error("route registry line {line} is malformed: {reason}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
    /// The registry lists no shapefile routes.
    #[error("route registry {path} lists no routes")]
    Empty {
        /// Registry path.
        path: Utf8PathBuf,
    },
}

/// Errors returned when reading the connected-route mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be read.
    #[error("failed to read connected-route mapping {path}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
        /// Mapping path.
        path: Utf8PathBuf,
    },
    /// The mapping is not a JSON object of file names to paths.
    #[error("connected-route mapping {path} is not valid JSON")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Mapping path.
        path: Utf8PathBuf,
    },
}
