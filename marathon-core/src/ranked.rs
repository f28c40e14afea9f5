//! Output of the ranking engine.
//!
//! A [`RankedTable`] keeps every input route in input order with one weighted
//! rank per metric and an overall score. Higher scores denote better routes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Suffix appended to a metric name to form its weighted rank column.
pub const WEIGHTED_RANK_SUFFIX: &str = " Weighted Rank";

/// Name of the aggregate score column, always last.
pub const OVERALL_SCORE_COLUMN: &str = "Overall Weighted Score";

/// Column name holding the weighted rank of `metric`.
///
/// # Examples
/// ```
/// use marathon_core::weighted_rank_column;
///
/// assert_eq!(weighted_rank_column("Elevation Gain"), "Elevation Gain Weighted Rank");
/// ```
#[must_use]
pub fn weighted_rank_column(metric: &str) -> String {
    format!("{metric}{WEIGHTED_RANK_SUFFIX}")
}

/// Weighted ranks and overall score for one route.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedRow {
    route: String,
    weighted_ranks: BTreeMap<String, f64>,
    overall_score: Option<f64>,
}

impl RankedRow {
    /// Assemble a row from its weighted ranks and score.
    #[must_use]
    pub const fn new(
        route: String,
        weighted_ranks: BTreeMap<String, f64>,
        overall_score: Option<f64>,
    ) -> Self {
        Self {
            route,
            weighted_ranks,
            overall_score,
        }
    }

    /// Identifier of the route.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Weighted rank for `metric`; `None` when the route had no value.
    #[must_use]
    pub fn weighted_rank(&self, metric: &str) -> Option<f64> {
        self.weighted_ranks.get(metric).copied()
    }

    /// Iterate over the weighted ranks present for this route.
    pub fn weighted_ranks(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weighted_ranks
            .iter()
            .map(|(metric, rank)| (metric.as_str(), *rank))
    }

    /// Mean of the available weighted ranks; `None` without any rank.
    #[must_use]
    pub const fn overall_score(&self) -> Option<f64> {
        self.overall_score
    }
}

/// Per-metric weighted ranks plus an aggregate score for every route.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedTable {
    metrics: Vec<String>,
    rows: Vec<RankedRow>,
}

impl RankedTable {
    /// Create an empty table ranking `metrics` in the given column order.
    #[must_use]
    pub const fn new(metrics: Vec<String>) -> Self {
        Self {
            metrics,
            rows: Vec::new(),
        }
    }

    /// Append a route's row.
    pub fn push_row(&mut self, row: RankedRow) {
        self.rows.push(row);
    }

    /// Ranked metric names in column order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Output column names: each weighted rank column, then the score.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.metrics
            .iter()
            .map(|metric| weighted_rank_column(metric))
            .chain(std::iter::once(OVERALL_SCORE_COLUMN.to_owned()))
            .collect()
    }

    /// Rows in input route order.
    #[must_use]
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    /// Row for `route`, if ranked.
    #[must_use]
    pub fn row(&self, route: &str) -> Option<&RankedRow> {
        self.rows.iter().find(|row| row.route == route)
    }

    /// Weighted rank of `metric` for `route`.
    #[must_use]
    pub fn weighted_rank(&self, route: &str, metric: &str) -> Option<f64> {
        self.row(route).and_then(|row| row.weighted_rank(metric))
    }

    /// Overall score for `route`.
    #[must_use]
    pub fn overall_score(&self, route: &str) -> Option<f64> {
        self.row(route).and_then(RankedRow::overall_score)
    }

    /// Rows ordered best first.
    ///
    /// Routes without a score sort last; equal scores keep input order.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<&RankedRow> {
        let mut ordered: Vec<&RankedRow> = self.rows.iter().collect();
        ordered.sort_by(|left, right| compare_scores(left.overall_score, right.overall_score));
        ordered
    }

    /// Route with the highest overall score.
    #[must_use]
    pub fn best_route(&self) -> Option<&str> {
        self.leaderboard()
            .into_iter()
            .next()
            .filter(|row| row.overall_score.is_some())
            .map(RankedRow::route)
    }

    /// Number of ranked routes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether no route was ranked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn compare_scores(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
