//! Error types emitted by the marathon CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use marathon_data::{LoadError, UnknownLayout, WriteError};
use marathon_scorer::RankingError;
use thiserror::Error;

/// Errors emitted by the marathon CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// No positional input path was given on the command line or in config.
    #[error("missing {field} (pass one or more {field} paths or set {env})")]
    MissingPaths {
        /// Positional argument name.
        field: &'static str,
        /// Environment variable that can supply the paths.
        env: &'static str,
    },
    /// The `--layout` value is not a known table layout.
    #[error(transparent)]
    InvalidLayout(#[from] UnknownLayout),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Loading or merging the metric tables failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The ranking engine rejected the merged table.
    #[error(transparent)]
    Rank(#[from] RankingError),
    /// Writing the ranked table failed.
    #[error(transparent)]
    Write(#[from] WriteError),
    /// Encoding the comparison report failed.
    #[error("failed to encode comparison report: {0}")]
    EncodeReport(#[source] serde_json::Error),
    /// Writing command output to stdout failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
