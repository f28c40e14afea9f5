//! Errors raised while building or merging metric tables.

use thiserror::Error;

/// Errors raised when a table cannot be interpreted as route by metric.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// The source could not be read as a rectangular route by metric table.
    #[error("malformed metric table: {reason}")]
    Malformed {
        /// Human-readable description of the defect.
        reason: String,
    },
    /// No source tables were supplied to the merger.
    #[error("at least one metric table is required")]
    NoInput,
    /// A route used the identifier reserved for the weight row.
    #[error("route identifier {route:?} is reserved for metric weights")]
    ReservedRoute {
        /// Offending route identifier.
        route: String,
    },
    /// A route identifier appeared more than once in one source.
    #[error("route {route:?} appears more than once")]
    DuplicateRoute {
        /// Repeated route identifier.
        route: String,
    },
    /// A metric name appeared more than once in one source.
    #[error("metric {metric:?} appears more than once")]
    DuplicateMetric {
        /// Repeated metric name.
        metric: String,
    },
    /// A weight was zero, negative or not finite.
    #[error("weight {weight} for metric {metric:?} must be positive and finite")]
    InvalidWeight {
        /// Metric the weight belongs to.
        metric: String,
        /// Rejected weight value.
        weight: f64,
    },
}

impl TableError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
