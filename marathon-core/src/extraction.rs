//! Boundary with the GIS metric extraction collaborator.
//!
//! Extraction buffers a route, intersects the buffer with reference layers
//! and reports one value per metric label. The analysis itself lives outside
//! this workspace; implementations plug in through [`MetricExtractor`] and
//! receive every setting through an explicit [`ExtractionConfig`].
//! [`extract_batch`] runs an extractor over a registry of routes and collects
//! the results into a [`MetricTable`] ready for ranking.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MetricTable, RouteSource, TableError};

/// Count of points of interest and attractions inside the route buffer.
pub const PLACES_OF_INTEREST: &str = "Number of Places of Interests";
/// Count of subway stations inside the route buffer.
pub const SUBWAY_STATIONS: &str = "Number of Subway Stations";
/// Count of above-average car traffic intersections inside the route buffer.
pub const HIGH_TRAFFIC_INTERSECTIONS: &str = "Number of High Traffic Intersections";
/// Count of residential zones touching the route buffer.
pub const RESIDENTIAL_ZONES: &str = "Number of Residential Zones";
/// Square metres of business improvement area overlapping the route buffer.
pub const BUSINESS_IMPROVEMENT_AREA: &str = "Areas of Business Improvement Areas";
/// Count of condominiums enclosed by the closed-loop version of the route.
pub const CONDOMINIUMS: &str = "Number of Condomininiums within the Route Coverage Area";

/// Metric labels reported by the extraction collaborator, in column order.
pub const STANDARD_METRICS: [&str; 6] = [
    PLACES_OF_INTEREST,
    SUBWAY_STATIONS,
    HIGH_TRAFFIC_INTERSECTIONS,
    RESIDENTIAL_ZONES,
    BUSINESS_IMPROVEMENT_AREA,
    CONDOMINIUMS,
];

/// Linear unit of a buffer distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BufferUnit {
    /// Metres.
    #[default]
    Meters,
    /// Kilometres.
    Kilometers,
}

impl BufferUnit {
    /// Unit name as understood by GIS linear-unit strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "Meters",
            Self::Kilometers => "Kilometers",
        }
    }
}

impl fmt::Display for BufferUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while validating buffer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The unit was neither metres nor kilometres.
    #[error("unknown buffer unit {0:?} (expected Meters, Kilometers, m or km)")]
    UnknownUnit(String),
    /// The distance was zero.
    #[error("buffer distance must be a positive whole number")]
    ZeroDistance,
}

impl FromStr for BufferUnit {
    type Err = BufferError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unit = raw.trim();
        if unit.eq_ignore_ascii_case("meters") || unit.eq_ignore_ascii_case("m") {
            Ok(Self::Meters)
        } else if unit.eq_ignore_ascii_case("kilometers") || unit.eq_ignore_ascii_case("km") {
            Ok(Self::Kilometers)
        } else {
            Err(BufferError::UnknownUnit(unit.to_owned()))
        }
    }
}

/// A positive whole buffer distance with its unit.
///
/// # Examples
/// ```
/// use marathon_core::{BufferDistance, BufferUnit};
///
/// # fn main() -> Result<(), marathon_core::BufferError> {
/// let buffer = BufferDistance::new(100, BufferUnit::Meters)?;
/// assert_eq!(buffer.to_string(), "100 Meters");
/// assert!(BufferDistance::new(0, BufferUnit::Kilometers).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferDistance {
    value: NonZeroU32,
    unit: BufferUnit,
}

impl BufferDistance {
    /// Validate and build a buffer distance.
    ///
    /// # Errors
    /// Returns [`BufferError::ZeroDistance`] when `value` is zero.
    pub fn new(value: u32, unit: BufferUnit) -> Result<Self, BufferError> {
        let distance = NonZeroU32::new(value).ok_or(BufferError::ZeroDistance)?;
        Ok(Self {
            value: distance,
            unit,
        })
    }

    /// Magnitude of the distance.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.value.get()
    }

    /// Unit of the distance.
    #[must_use]
    pub const fn unit(self) -> BufferUnit {
        self.unit
    }
}

impl fmt::Display for BufferDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Settings handed to every extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionConfig {
    /// Scratch workspace where intermediate artefacts are created.
    pub workspace: Utf8PathBuf,
    /// Directory holding reference layers and route geometry.
    pub data_dir: Utf8PathBuf,
    /// Buffer applied around each route.
    pub buffer: BufferDistance,
}

impl ExtractionConfig {
    /// Bundle extraction settings.
    #[must_use]
    pub fn new(
        workspace: impl Into<Utf8PathBuf>,
        data_dir: impl Into<Utf8PathBuf>,
        buffer: BufferDistance,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            data_dir: data_dir.into(),
            buffer,
        }
    }

    /// Resolve `relative` against the data directory.
    #[must_use]
    pub fn data_path(&self, relative: &Utf8Path) -> Utf8PathBuf {
        self.data_dir.join(relative)
    }

    /// Location for a named scratch artefact inside the workspace.
    #[must_use]
    pub fn scratch_path(&self, name: &str) -> Utf8PathBuf {
        self.workspace.join(name)
    }
}

/// Values reported for one route, keyed by metric label.
///
/// `None` marks a metric the extractor could not measure for this route, for
/// example when no closed-loop version of the route is on record.
pub type RouteMetrics = BTreeMap<String, Option<f64>>;

/// A route whose extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("metric extraction failed for route {route:?}: {message}")]
pub struct ExtractionFailure {
    /// Route that failed.
    pub route: String,
    /// Description reported by the collaborator.
    pub message: String,
}

impl ExtractionFailure {
    /// Describe a failed route.
    #[must_use]
    pub fn new(route: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            message: message.into(),
        }
    }
}

/// Measure route surroundings with GIS analysis.
///
/// Implementations must report non-negative values and must release any
/// intermediate artefacts before returning, whether or not extraction
/// succeeded (see [`ScratchArtifacts`](crate::ScratchArtifacts)).
pub trait MetricExtractor {
    /// Measure every metric label for `route`.
    ///
    /// # Errors
    /// Returns [`ExtractionFailure`] when any analysis step fails; the
    /// route is then left out of the batch entirely.
    fn extract(
        &self,
        route: &RouteSource,
        config: &ExtractionConfig,
    ) -> Result<RouteMetrics, ExtractionFailure>;
}

impl<E: MetricExtractor + ?Sized> MetricExtractor for &E {
    fn extract(
        &self,
        route: &RouteSource,
        config: &ExtractionConfig,
    ) -> Result<RouteMetrics, ExtractionFailure> {
        (**self).extract(route, config)
    }
}

/// Errors that abort a whole extraction batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    /// The registry listed no routes.
    #[error("no routes were registered for extraction")]
    NoRoutes,
    /// Every route failed extraction.
    #[error("no usable metric data: all {} route(s) failed extraction", failures.len())]
    NoUsableData {
        /// Per-route failures, in registry order.
        failures: Vec<ExtractionFailure>,
    },
    /// A route's results could not be stored in the table.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result of a batch where at least one route succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Table of successfully extracted routes.
    pub table: MetricTable,
    /// Routes that failed and were left out of `table`.
    pub failures: Vec<ExtractionFailure>,
}

/// Run `extractor` over `routes` and collect a fully materialised table.
///
/// Columns start with [`STANDARD_METRICS`]; any additional label reported by
/// the extractor is appended. A failed route contributes no row at all.
///
/// # Errors
/// Returns [`BatchError::NoRoutes`] for an empty registry,
/// [`BatchError::NoUsableData`] when every route fails, and
/// [`BatchError::Table`] for duplicate or reserved route names.
pub fn extract_batch<E>(
    extractor: &E,
    routes: &[RouteSource],
    config: &ExtractionConfig,
) -> Result<BatchOutcome, BatchError>
where
    E: MetricExtractor + ?Sized,
{
    if routes.is_empty() {
        return Err(BatchError::NoRoutes);
    }
    let mut table = MetricTable::new();
    for metric in STANDARD_METRICS {
        table.insert_metric(metric)?;
    }
    let mut failures = Vec::new();
    for route in routes {
        if table.row(&route.name).is_some() {
            return Err(TableError::DuplicateRoute {
                route: route.name.clone(),
            }
            .into());
        }
        debug!("extracting metrics for {} with buffer {}", route.name, config.buffer);
        match extractor
            .extract(route, config)
            .and_then(|metrics| validate_metrics(&route.name, metrics))
        {
            Ok(metrics) => record_route(&mut table, &route.name, &metrics)?,
            Err(failure) => {
                warn!("skipping route {}: {}", route.name, failure.message);
                failures.push(failure);
            }
        }
    }
    if table.is_empty() {
        return Err(BatchError::NoUsableData { failures });
    }
    info!(
        "extracted metrics for {} of {} route(s)",
        table.route_count(),
        routes.len()
    );
    Ok(BatchOutcome { table, failures })
}

fn validate_metrics(route: &str, metrics: RouteMetrics) -> Result<RouteMetrics, ExtractionFailure> {
    let negative = metrics
        .iter()
        .find(|(_, value)| value.is_some_and(|present| present < 0.0));
    if let Some((metric, _)) = negative {
        return Err(ExtractionFailure::new(
            route,
            format!("metric {metric:?} reported a negative value"),
        ));
    }
    Ok(metrics)
}

fn record_route(
    table: &mut MetricTable,
    route: &str,
    metrics: &RouteMetrics,
) -> Result<(), TableError> {
    table.insert_route(route)?;
    for (metric, value) in metrics {
        table.set_value(route, metric, *value)?;
    }
    Ok(())
}
