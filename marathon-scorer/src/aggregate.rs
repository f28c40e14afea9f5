//! Weighting ranks and folding them into an overall score.
#![forbid(unsafe_code)]

/// Multiply a within-metric rank by its metric weight.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "weighted ranks scale small rank counts by real-valued weights"
)]
pub const fn weighted_rank(rank: usize, weight: f64) -> f64 {
    rank as f64 * weight
}

/// Arithmetic mean of the available weighted ranks.
///
/// Returns `None` when the route has no ranks; absent metrics count in
/// neither the numerator nor the denominator.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the overall score averages weighted ranks"
)]
pub fn mean_score<I>(weighted_ranks: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = weighted_ranks
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, n), rank| (sum + rank, n + 1));
    (count > 0).then(|| total / count as f64)
}
