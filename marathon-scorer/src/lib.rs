//! Ranking engine for marathon route metric tables.
//!
//! [`rank_routes`] turns a merged [`MetricTable`] into a [`RankedTable`]:
//!
//! 1. metrics in the [`DirectionSet`] are negated so larger is always better;
//! 2. each metric column is ranked ascending over the routes that have a
//!    value, ties sharing the maximum rank of their group;
//! 3. every rank is multiplied by its metric weight (default `1.0`);
//! 4. a route's overall score is the mean of its available weighted ranks.
//!
//! Higher scores denote better routes. Missing values never receive a rank
//! and never shift the ranks of other routes.
//!
//! # Examples
//! ```
//! use marathon_core::{DirectionSet, MetricTable};
//! use marathon_scorer::rank_routes;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = MetricTable::new()
//!     .with_value("R1", "Subway", 3.0)?
//!     .with_value("R2", "Subway", 7.0)?;
//! let ranked = rank_routes(&table, &DirectionSet::empty())?;
//! assert_eq!(ranked.best_route(), Some("R2"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod aggregate;
mod baseline;
mod direction;
mod error;
mod rank;


use std::collections::BTreeMap;

use log::{debug, info};
use marathon_core::{DirectionSet, MetricTable, RankedRow, RankedTable};

pub use aggregate::{mean_score, weighted_rank};
pub use baseline::{
    BaselineComparison, MetricDifference, ZERO_BASELINE_EPSILON, compare_to_baseline,
    percent_change,
};
pub use direction::apply_direction;
pub use error::RankingError;
pub use rank::max_ranks;

/// Rank every route in `table` and compute its overall weighted score.
///
/// Rows of the result follow the input route order; use
/// [`RankedTable::leaderboard`] for best-first ordering.
///
/// # Errors
/// Returns [`RankingError::NoRoutes`] when `table` holds no routes.
pub fn rank_routes(
    table: &MetricTable,
    directions: &DirectionSet,
) -> Result<RankedTable, RankingError> {
    if table.is_empty() {
        return Err(RankingError::NoRoutes);
    }
    let corrected = apply_direction(table, directions);
    let weights = corrected.weight_vector();

    let mut per_route: Vec<BTreeMap<String, f64>> = vec![BTreeMap::new(); corrected.route_count()];
    for metric in corrected.metrics() {
        let weight = weights.weight(metric);
        let ranked = rank::rank_column(&corrected, metric);
        debug!("ranked {} routes on {metric} (weight {weight})", ranked.len());
        for (position, rank) in ranked {
            if let Some(ranks) = per_route.get_mut(position) {
                ranks.insert(metric.clone(), weighted_rank(rank, weight));
            }
        }
    }

    let mut result = RankedTable::new(corrected.metrics().to_vec());
    for (row, ranks) in corrected.rows().iter().zip(per_route) {
        let score = mean_score(ranks.values().copied());
        result.push_row(RankedRow::new(row.route().to_owned(), ranks, score));
    }
    info!(
        "ranked {} routes across {} metrics",
        result.len(),
        result.metrics().len()
    );
    Ok(result)
}
