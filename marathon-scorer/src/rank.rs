//! Within-metric rank computation.
#![forbid(unsafe_code)]

use marathon_core::MetricTable;

/// Rank `values` in ascending order with the "max" tie-break.
///
/// Each value's rank is the number of values less than or equal to it, so a
/// tied group shares the highest ordinal position of the group.
///
/// # Examples
/// ```
/// use marathon_scorer::max_ranks;
///
/// assert_eq!(max_ranks(&[10.0, 20.0, 20.0, 30.0]), vec![1, 3, 3, 4]);
/// ```
#[must_use]
pub fn max_ranks(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    values
        .iter()
        .map(|value| sorted.partition_point(|probe| probe <= value))
        .collect()
}

/// Rank one metric column over the routes that have a value.
///
/// Returns `(row position, rank)` pairs; routes without a value are absent
/// and do not shift the ranks of the others.
pub(crate) fn rank_column(table: &MetricTable, metric: &str) -> Vec<(usize, usize)> {
    let (positions, values): (Vec<usize>, Vec<f64>) = table
        .column(metric)
        .enumerate()
        .filter_map(|(position, (_, value))| value.map(|present| (position, present)))
        .unzip();
    positions.into_iter().zip(max_ranks(&values)).collect()
}
