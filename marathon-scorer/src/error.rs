//! Error types raised while ranking routes.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised by the ranking engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// The merged table contained no routes to rank.
    #[error("no routes to rank")]
    NoRoutes,
    /// A comparison referenced a route missing from the table.
    #[error("route {route:?} is not present in the metric table")]
    UnknownRoute {
        /// Requested route identifier.
        route: String,
    },
}
