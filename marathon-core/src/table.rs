//! Route by metric tables.
//!
//! A [`MetricTable`] holds one row per candidate route and one column per
//! metric. Cells are optional: a route may lack a value for any metric and a
//! missing cell never turns into zero. An optional weight row attaches a
//! positive multiplier to each metric.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::TableError;

/// Reserved row key holding per-metric weights.
pub const WEIGHT_ROW: &str = "weight";

/// Weight used for metrics without an explicit entry in the weight row.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Report whether `key` names the reserved weight row.
///
/// The comparison ignores ASCII case and surrounding whitespace.
///
/// # Examples
/// ```
/// use marathon_core::is_weight_key;
///
/// assert!(is_weight_key("Weight "));
/// assert!(!is_weight_key("Route A"));
/// ```
#[must_use]
pub fn is_weight_key(key: &str) -> bool {
    key.trim().eq_ignore_ascii_case(WEIGHT_ROW)
}

/// Metric values recorded for a single route.
///
/// Metrics without an entry are missing for this route.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteRow {
    route: String,
    values: BTreeMap<String, f64>,
}

impl RouteRow {
    const fn new(route: String) -> Self {
        Self {
            route,
            values: BTreeMap::new(),
        }
    }

    /// Identifier of the route.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Value recorded for `metric`, if any.
    #[must_use]
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Iterate over the values present for this route.
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .map(|(metric, value)| (metric.as_str(), *value))
    }

    /// Number of metrics with a value for this route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether the route has no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, metric: &str, value: Option<f64>) {
        self.values.remove(metric);
        if let Some(present) = value.filter(|candidate| candidate.is_finite()) {
            self.values.insert(metric.to_owned(), present);
        }
    }

    pub(crate) fn fill_missing(&mut self, other: &Self) {
        for (metric, value) in &other.values {
            self.values.entry(metric.clone()).or_insert(*value);
        }
    }
}

/// Explicit per-metric weights taken from the reserved `weight` row.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WeightRow {
    weights: BTreeMap<String, f64>,
}

impl WeightRow {
    /// Create an empty weight row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Record the weight for `metric`.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidWeight`] when `weight` is not a positive,
    /// finite number.
    pub fn set(&mut self, metric: impl Into<String>, weight: f64) -> Result<(), TableError> {
        let name = metric.into();
        if !(weight.is_finite() && weight > 0.0) {
            return Err(TableError::InvalidWeight {
                metric: name,
                weight,
            });
        }
        self.weights.insert(name, weight);
        Ok(())
    }

    /// Weight recorded for `metric`, if any.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.weights.get(metric).copied()
    }

    /// Iterate over explicit weights in metric-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights
            .iter()
            .map(|(metric, weight)| (metric.as_str(), *weight))
    }

    /// Number of explicit weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Report whether no weight was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub(crate) fn fill_missing(&mut self, other: &Self) {
        for (metric, weight) in &other.weights {
            self.weights.entry(metric.clone()).or_insert(*weight);
        }
    }
}

/// Resolved weight for every metric of a table.
///
/// Metrics without an explicit weight resolve to [`DEFAULT_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    /// Weight applied to `metric`.
    #[must_use]
    pub fn weight(&self, metric: &str) -> f64 {
        self.weights.get(metric).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Iterate over resolved weights in metric-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights
            .iter()
            .map(|(metric, weight)| (metric.as_str(), *weight))
    }
}

/// A route by metric table with optional per-metric weights.
///
/// Route and metric order follow insertion order, which mirrors the order of
/// the source files.
///
/// # Examples
/// ```
/// use marathon_core::MetricTable;
///
/// # fn main() -> Result<(), marathon_core::TableError> {
/// let table = MetricTable::new()
///     .with_value("R1", "Number of Subway Stations", 4.0)?
///     .with_value("R2", "Number of Subway Stations", 7.0)?
///     .with_weight("Number of Subway Stations", 2.0)?;
///
/// assert_eq!(table.route_count(), 2);
/// assert_eq!(table.value("R2", "Number of Subway Stations"), Some(7.0));
/// assert_eq!(table.weight_vector().weight("Number of Subway Stations"), 2.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricTable {
    metrics: Vec<String>,
    rows: Vec<RouteRow>,
    weights: Option<WeightRow>,
}

impl MetricTable {
    /// Create an empty table without a weight row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            metrics: Vec::new(),
            rows: Vec::new(),
            weights: None,
        }
    }

    /// Build a table from `(route, [(metric, value)])` records.
    ///
    /// # Errors
    /// Returns [`TableError`] when a route or metric name is invalid, or when
    /// a route appears in more than one record.
    pub fn from_rows<'a, I, C>(records: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (&'a str, C)>,
        C: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::new();
        for (route, cells) in records {
            if table.row(route).is_some() {
                return Err(TableError::DuplicateRoute {
                    route: route.to_owned(),
                });
            }
            table.insert_route(route)?;
            for (metric, value) in cells {
                table.set_value(route, metric, Some(value))?;
            }
        }
        Ok(table)
    }

    /// Set a value and return the table, for chained construction.
    ///
    /// # Errors
    /// See [`MetricTable::set_value`].
    pub fn with_value(mut self, route: &str, metric: &str, value: f64) -> Result<Self, TableError> {
        self.set_value(route, metric, Some(value))?;
        Ok(self)
    }

    /// Set a weight and return the table, for chained construction.
    ///
    /// # Errors
    /// See [`MetricTable::set_weight`].
    pub fn with_weight(mut self, metric: &str, weight: f64) -> Result<Self, TableError> {
        self.set_weight(metric, weight)?;
        Ok(self)
    }

    /// Add a route without values, keeping existing routes untouched.
    ///
    /// # Errors
    /// Returns [`TableError::ReservedRoute`] for the weight row key and
    /// [`TableError::Malformed`] for a blank identifier.
    pub fn insert_route(&mut self, route: &str) -> Result<(), TableError> {
        validate_route(route)?;
        if self.row(route).is_none() {
            self.rows.push(RouteRow::new(route.to_owned()));
        }
        Ok(())
    }

    /// Add a metric column without values.
    ///
    /// # Errors
    /// Returns [`TableError::Malformed`] for a blank metric name.
    pub fn insert_metric(&mut self, metric: &str) -> Result<(), TableError> {
        if metric.trim().is_empty() {
            return Err(TableError::malformed("metric name is empty"));
        }
        if !self.metrics.iter().any(|known| known == metric) {
            self.metrics.push(metric.to_owned());
        }
        Ok(())
    }

    /// Set or clear the value of `metric` for `route`.
    ///
    /// `None` and non-finite values mark the cell as missing. The route and
    /// metric are added when not yet present.
    ///
    /// # Errors
    /// Returns [`TableError`] when the route or metric name is invalid.
    pub fn set_value(
        &mut self,
        route: &str,
        metric: &str,
        value: Option<f64>,
    ) -> Result<(), TableError> {
        self.insert_metric(metric)?;
        self.insert_route(route)?;
        if let Some(row) = self.row_mut(route) {
            row.set(metric, value);
        }
        Ok(())
    }

    /// Record an explicit weight for `metric`, creating the weight row.
    ///
    /// # Errors
    /// Returns [`TableError::InvalidWeight`] for a non-positive or
    /// non-finite weight and [`TableError::Malformed`] for a blank name.
    pub fn set_weight(&mut self, metric: &str, weight: f64) -> Result<(), TableError> {
        self.insert_metric(metric)?;
        self.weights
            .get_or_insert_with(WeightRow::new)
            .set(metric, weight)
    }

    /// Attach an empty weight row if none exists yet.
    pub fn ensure_weight_row(&mut self) {
        self.weights.get_or_insert_with(WeightRow::new);
    }

    /// Value of `metric` for `route`, if present.
    #[must_use]
    pub fn value(&self, route: &str, metric: &str) -> Option<f64> {
        self.row(route).and_then(|row| row.value(metric))
    }

    /// Row for `route`, if present.
    #[must_use]
    pub fn row(&self, route: &str) -> Option<&RouteRow> {
        self.rows.iter().find(|row| row.route == route)
    }

    fn row_mut(&mut self, route: &str) -> Option<&mut RouteRow> {
        self.rows.iter_mut().find(|row| row.route == route)
    }

    /// Rows in route order.
    #[must_use]
    pub fn rows(&self) -> &[RouteRow] {
        &self.rows
    }

    /// Route identifiers in route order.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(RouteRow::route)
    }

    /// Metric names in column order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Report whether the table has a column named `metric`.
    #[must_use]
    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|known| known == metric)
    }

    /// The explicit weight row, if any source supplied one.
    #[must_use]
    pub const fn weights(&self) -> Option<&WeightRow> {
        self.weights.as_ref()
    }

    /// Resolve a weight for every metric column.
    #[must_use]
    pub fn weight_vector(&self) -> WeightVector {
        let weights = self
            .metrics
            .iter()
            .map(|metric| {
                let weight = self
                    .weights
                    .as_ref()
                    .and_then(|row| row.get(metric))
                    .unwrap_or(DEFAULT_WEIGHT);
                (metric.clone(), weight)
            })
            .collect();
        WeightVector { weights }
    }

    /// Column view of `metric`: every route with its optional value.
    pub fn column<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = (&'a str, Option<f64>)> {
        self.rows
            .iter()
            .map(move |row| (row.route(), row.value(metric)))
    }

    /// Return a copy of the table with every present value passed through
    /// `adjust`.
    ///
    /// Missing cells stay missing and the weight row is copied unchanged.
    #[must_use]
    pub fn map_values<F>(&self, mut adjust: F) -> Self
    where
        F: FnMut(&str, f64) -> f64,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut mapped = RouteRow::new(row.route.clone());
                for (metric, value) in row.values() {
                    mapped.set(metric, Some(adjust(metric, value)));
                }
                mapped
            })
            .collect();
        Self {
            metrics: self.metrics.clone(),
            rows,
            weights: self.weights.clone(),
        }
    }

    /// Number of routes.
    #[must_use]
    pub const fn route_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of metric columns.
    #[must_use]
    pub const fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    /// Report whether the table has no routes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn row_entry(&mut self, route: &str) -> Option<&mut RouteRow> {
        if self.row(route).is_none() {
            self.rows.push(RouteRow::new(route.to_owned()));
        }
        self.row_mut(route)
    }

    pub(crate) fn push_metric(&mut self, metric: &str) {
        if !self.has_metric(metric) {
            self.metrics.push(metric.to_owned());
        }
    }

    pub(crate) fn weights_mut(&mut self) -> &mut Option<WeightRow> {
        &mut self.weights
    }
}

fn validate_route(route: &str) -> Result<(), TableError> {
    if route.trim().is_empty() {
        return Err(TableError::malformed("route identifier is empty"));
    }
    if is_weight_key(route) {
        return Err(TableError::ReservedRoute {
            route: route.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn absent_values_stay_missing() {
        let table = MetricTable::new()
            .with_value("R1", "A", 10.0)
            .and_then(|t| t.with_value("R2", "B", 3.0))
            .expect("build table");

        assert_eq!(table.value("R1", "B"), None);
        assert_eq!(table.value("R2", "A"), None);
        assert_eq!(table.metrics(), ["A", "B"]);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn non_finite_values_are_missing(#[case] value: f64) {
        let mut table = MetricTable::new();
        table
            .set_value("R1", "A", Some(value))
            .expect("set non-finite value");

        assert_eq!(table.value("R1", "A"), None);
        assert!(table.has_metric("A"));
        assert_eq!(table.route_count(), 1);
    }

    #[rstest]
    fn clearing_a_value_removes_it() {
        let mut table = MetricTable::new().with_value("R1", "A", 1.0).expect("table");
        table.set_value("R1", "A", None).expect("clear value");
        assert_eq!(table.value("R1", "A"), None);
    }

    #[rstest]
    #[case("weight")]
    #[case(" WEIGHT")]
    fn weight_key_is_not_a_route(#[case] route: &str) {
        let err = MetricTable::new()
            .with_value(route, "A", 1.0)
            .expect_err("reserved route should fail");
        assert!(matches!(err, TableError::ReservedRoute { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-2.0)]
    #[case(f64::NAN)]
    fn rejects_non_positive_weights(#[case] weight: f64) {
        let err = MetricTable::new()
            .with_weight("A", weight)
            .expect_err("invalid weight should fail");
        assert!(matches!(err, TableError::InvalidWeight { .. }));
    }

    #[rstest]
    fn weight_vector_defaults_to_one() {
        let table = MetricTable::new()
            .with_value("R1", "A", 1.0)
            .and_then(|t| t.with_value("R1", "B", 1.0))
            .and_then(|t| t.with_weight("B", 3.0))
            .expect("table");

        let weights = table.weight_vector();
        assert_eq!(weights.weight("A"), DEFAULT_WEIGHT);
        assert_eq!(weights.weight("B"), 3.0);
        assert_eq!(weights.weight("unknown"), DEFAULT_WEIGHT);
    }

    #[rstest]
    fn from_rows_rejects_duplicate_routes() {
        let err = MetricTable::from_rows([("R1", vec![("A", 1.0)]), ("R1", vec![("A", 2.0)])])
            .expect_err("duplicate route should fail");
        assert_eq!(
            err,
            TableError::DuplicateRoute {
                route: "R1".to_owned()
            }
        );
    }

    #[rstest]
    fn map_values_keeps_missing_cells_and_weights() {
        let table = MetricTable::from_rows([("R1", vec![("A", 2.0)]), ("R2", vec![("B", 4.0)])])
            .and_then(|t| t.with_weight("A", 5.0))
            .expect("table");

        let doubled = table.map_values(|_, value| value * 2.0);

        assert_eq!(doubled.value("R1", "A"), Some(4.0));
        assert_eq!(doubled.value("R1", "B"), None);
        assert_eq!(doubled.value("R2", "B"), Some(8.0));
        assert_eq!(doubled.weights(), table.weights());
        assert_eq!(doubled.metrics(), table.metrics());
    }

    #[rstest]
    fn column_lists_every_route() {
        let table = MetricTable::from_rows([("R1", vec![("A", 2.0)]), ("R2", vec![("B", 4.0)])])
            .expect("table");

        let column: Vec<_> = table.column("A").collect();
        assert_eq!(column, vec![("R1", Some(2.0)), ("R2", None)]);
    }
}
