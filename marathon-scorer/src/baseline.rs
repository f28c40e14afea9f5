//! Percentage comparison of one route against a baseline route.
#![forbid(unsafe_code)]

use log::debug;
use marathon_core::{MetricTable, RouteRow};
use serde::Serialize;

use crate::RankingError;

/// Stand-in divisor used when the baseline value is exactly zero.
pub const ZERO_BASELINE_EPSILON: f64 = 0.0001;

/// Percentage change from `baseline` to `candidate`.
///
/// A zero baseline is replaced by [`ZERO_BASELINE_EPSILON`] so the result
/// stays finite.
///
/// # Examples
/// ```
/// use marathon_scorer::percent_change;
///
/// assert_eq!(percent_change(50.0, 75.0), 50.0);
/// assert_eq!(percent_change(0.0, 0.0), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "percentage differences are real-valued"
)]
pub const fn percent_change(baseline: f64, candidate: f64) -> f64 {
    let divisor = if baseline == 0.0 {
        ZERO_BASELINE_EPSILON
    } else {
        baseline
    };
    (candidate - baseline) / divisor * 100.0
}

/// Difference recorded for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDifference {
    /// Metric name.
    pub metric: String,
    /// Value observed on the baseline route.
    pub baseline: f64,
    /// Value observed on the candidate route.
    pub candidate: f64,
    /// Percentage change from baseline to candidate.
    pub percent_change: f64,
}

/// Per-metric comparison of a candidate route against a baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineComparison {
    /// Route used as the reference point.
    pub baseline: String,
    /// Route being compared.
    pub candidate: String,
    /// Differences for every metric both routes report, in column order.
    pub differences: Vec<MetricDifference>,
}

impl BaselineComparison {
    /// Difference for `metric`, if both routes reported it.
    #[must_use]
    pub fn difference(&self, metric: &str) -> Option<&MetricDifference> {
        self.differences.iter().find(|diff| diff.metric == metric)
    }
}

/// Compare `candidate` against `baseline` over the raw metric values.
///
/// Metrics missing on either route are skipped. Values are compared as
/// stored; no directionality correction is applied.
///
/// # Errors
/// Returns [`RankingError::UnknownRoute`] when either route is absent from
/// `table`.
pub fn compare_to_baseline(
    table: &MetricTable,
    baseline: &str,
    candidate: &str,
) -> Result<BaselineComparison, RankingError> {
    let reference = find_row(table, baseline)?;
    let compared = find_row(table, candidate)?;
    let differences: Vec<MetricDifference> = table
        .metrics()
        .iter()
        .filter_map(|metric| {
            let before = reference.value(metric)?;
            let after = compared.value(metric)?;
            Some(MetricDifference {
                metric: metric.clone(),
                baseline: before,
                candidate: after,
                percent_change: percent_change(before, after),
            })
        })
        .collect();
    debug!(
        "compared {candidate} against {baseline} over {} metrics",
        differences.len()
    );
    Ok(BaselineComparison {
        baseline: baseline.to_owned(),
        candidate: candidate.to_owned(),
        differences,
    })
}

fn find_row<'t>(table: &'t MetricTable, route: &str) -> Result<&'t RouteRow, RankingError> {
    table.row(route).ok_or_else(|| RankingError::UnknownRoute {
        route: route.to_owned(),
    })
}
