//! Metrics whose lower raw value denotes better performance.
//!
//! Ranking treats a higher value as better, so the scorer negates every
//! metric listed in a [`DirectionSet`] before ranking.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::extraction::{CONDOMINIUMS, HIGH_TRAFFIC_INTERSECTIONS};

/// Turn sharpness along the course.
pub const TURN_SHARPNESS: &str = "Turn Sharpness";
/// Cumulative elevation gain along the course.
pub const ELEVATION_GAIN: &str = "Elevation Gain";

/// Named set of "lower is better" metrics.
///
/// # Examples
/// ```
/// use marathon_core::DirectionSet;
///
/// let directions = DirectionSet::marathon_defaults();
/// assert!(directions.contains("Number of High Traffic Intersections"));
/// assert!(!directions.contains("Number of Subway Stations"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DirectionSet {
    lower_is_better: BTreeSet<String>,
}

impl DirectionSet {
    /// A set with no flipped metrics.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lower_is_better: BTreeSet::new(),
        }
    }

    /// The metrics a marathon organiser wants minimised: traffic conflicts,
    /// condominium density, sharp turns and climbing.
    #[must_use]
    pub fn marathon_defaults() -> Self {
        [
            HIGH_TRAFFIC_INTERSECTIONS,
            CONDOMINIUMS,
            TURN_SHARPNESS,
            ELEVATION_GAIN,
        ]
        .into_iter()
        .collect()
    }

    /// Mark `metric` as "lower is better".
    pub fn insert(&mut self, metric: impl Into<String>) {
        self.lower_is_better.insert(metric.into());
    }

    /// Report whether `metric` is "lower is better".
    #[must_use]
    pub fn contains(&self, metric: &str) -> bool {
        self.lower_is_better.contains(metric)
    }

    /// Iterate over flipped metric names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lower_is_better.iter().map(String::as_str)
    }

    /// Number of flipped metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower_is_better.len()
    }

    /// Report whether no metric is flipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower_is_better.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DirectionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            lower_is_better: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for DirectionSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.lower_is_better
            .extend(iter.into_iter().map(Into::into));
    }
}
