//! Directionality correction for "lower is better" metrics.
#![forbid(unsafe_code)]

use log::debug;
use marathon_core::{DirectionSet, MetricTable};

/// Negate every value of the metrics listed in `directions`.
///
/// Other metrics, missing cells and the weight row pass through unchanged;
/// weights stay attached to their metric names and are never negated.
/// Applying the correction twice restores the original values, so the
/// pipeline applies it exactly once per ranking run.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "directionality correction negates raw metric values"
)]
pub fn apply_direction(table: &MetricTable, directions: &DirectionSet) -> MetricTable {
    let flipped: Vec<&str> = table
        .metrics()
        .iter()
        .map(String::as_str)
        .filter(|metric| directions.contains(metric))
        .collect();
    if !flipped.is_empty() {
        debug!("treating lower values as better for {}", flipped.join(", "));
    }
    table.map_values(|metric, value| {
        if directions.contains(metric) {
            -value
        } else {
            value
        }
    })
}
