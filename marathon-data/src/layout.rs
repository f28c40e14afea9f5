//! Orientation of persisted metric tables.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How rows and columns of a CSV table map onto routes and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    /// Detect the layout from the first header cell.
    #[default]
    Auto,
    /// One row per route; header `Route,<metric>...`; optional `weight` row.
    Routes,
    /// One row per metric; header `Metric,<route>...`; optional `weight`
    /// column.
    Metrics,
}

impl TableLayout {
    /// Resolve [`TableLayout::Auto`] against the first header cell.
    ///
    /// # Examples
    /// ```
    /// use marathon_data::TableLayout;
    ///
    /// assert_eq!(TableLayout::Auto.resolve("Metrics"), TableLayout::Metrics);
    /// assert_eq!(TableLayout::Auto.resolve("Route"), TableLayout::Routes);
    /// assert_eq!(TableLayout::Routes.resolve("Metric"), TableLayout::Routes);
    /// ```
    #[must_use]
    pub fn resolve(self, index_header: &str) -> Self {
        match self {
            Self::Auto => {
                let label = index_header.trim();
                if label.eq_ignore_ascii_case("metric") || label.eq_ignore_ascii_case("metrics") {
                    Self::Metrics
                } else {
                    Self::Routes
                }
            }
            fixed => fixed,
        }
    }

    /// Lower-case name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Routes => "routes",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for an unrecognised layout name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown table layout {0:?}; expected auto, routes or metrics")]
pub struct UnknownLayout(pub String);

impl FromStr for TableLayout {
    type Err = UnknownLayout;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "routes" | "route" => Ok(Self::Routes),
            "metrics" | "metric" => Ok(Self::Metrics),
            _ => Err(UnknownLayout(value.to_owned())),
        }
    }
}
