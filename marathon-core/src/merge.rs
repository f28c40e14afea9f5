//! Merge partial metric tables from several batches.
//!
//! Merging fills gaps and never overwrites: the first non-missing value
//! loaded for a route and metric wins.

use log::debug;

use crate::{MetricTable, TableError, WeightRow};

impl MetricTable {
    /// Fill cells missing in `self` with values from `other`.
    ///
    /// Routes and metrics unknown to `self` are appended in `other`'s order.
    /// Weights follow the same rule, and a weight row is only introduced when
    /// `other` carries one.
    pub fn combine_first(&mut self, other: &Self) {
        for metric in other.metrics() {
            self.push_metric(metric);
        }
        for source in other.rows() {
            if let Some(target) = self.row_entry(source.route()) {
                target.fill_missing(source);
            }
        }
        if let Some(incoming) = other.weights() {
            self.weights_mut()
                .get_or_insert_with(WeightRow::new)
                .fill_missing(incoming);
        }
    }
}

/// Merge source tables in load order.
///
/// # Errors
/// Returns [`TableError::NoInput`] when `tables` is empty.
///
/// # Examples
/// ```
/// use marathon_core::{MetricTable, merge_tables};
///
/// # fn main() -> Result<(), marathon_core::TableError> {
/// let first = MetricTable::from_rows([("R1", [("A", 10.0)])])?;
/// let second = MetricTable::from_rows([("R1", [("A", 5.0)]), ("R2", [("A", 3.0)])])?;
///
/// let merged = merge_tables([first, second])?;
/// assert_eq!(merged.value("R1", "A"), Some(10.0));
/// assert_eq!(merged.value("R2", "A"), Some(3.0));
/// # Ok(())
/// # }
/// ```
pub fn merge_tables<I>(tables: I) -> Result<MetricTable, TableError>
where
    I: IntoIterator<Item = MetricTable>,
{
    let mut sources = tables.into_iter();
    let mut merged = sources.next().ok_or(TableError::NoInput)?;
    let mut count = 1_usize;
    for table in sources {
        merged.combine_first(&table);
        count += 1;
    }
    debug!(
        "merged {count} metric table(s) into {} routes and {} metrics",
        merged.route_count(),
        merged.metric_count()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn earlier_values_win_and_gaps_are_filled() {
        let first = MetricTable::from_rows([("R1", vec![("A", 10.0)])]).expect("first table");
        let second = MetricTable::from_rows([
            ("R1", vec![("A", 5.0), ("B", 7.0)]),
            ("R2", vec![("A", 3.0)]),
        ])
        .expect("second table");

        let merged = merge_tables([first, second]).expect("merge");

        let expected = MetricTable::from_rows([
            ("R1", vec![("A", 10.0), ("B", 7.0)]),
            ("R2", vec![("A", 3.0)]),
        ])
        .expect("expected table");
        assert_eq!(merged, expected);
    }

    #[rstest]
    fn merging_one_table_is_identity() {
        let table = MetricTable::from_rows([
            ("R1", vec![("A", 1.0), ("B", 2.0)]),
            ("R2", vec![("B", 4.0)]),
        ])
        .and_then(|t| t.with_weight("B", 2.0))
        .expect("table");

        let merged = merge_tables([table.clone()]).expect("merge");
        assert_eq!(merged, table);

        let mut doubled = table.clone();
        doubled.combine_first(&table);
        assert_eq!(doubled, table);
    }

    #[rstest]
    fn no_tables_is_an_error() {
        let err = merge_tables(Vec::new()).expect_err("empty input should fail");
        assert_eq!(err, TableError::NoInput);
    }

    #[rstest]
    fn weight_row_only_appears_when_supplied() {
        let first = MetricTable::from_rows([("R1", vec![("A", 1.0)])]).expect("first");
        let second = MetricTable::from_rows([("R2", vec![("A", 2.0)])]).expect("second");
        let merged = merge_tables([first.clone(), second]).expect("merge");
        assert!(merged.weights().is_none());

        let weighted = MetricTable::from_rows([("R3", vec![("B", 2.0)])])
            .and_then(|t| t.with_weight("B", 4.0))
            .expect("weighted");
        let merged_with_weights = merge_tables([first, weighted]).expect("merge");
        let weights = merged_with_weights.weights().expect("weight row");
        assert_eq!(weights.get("B"), Some(4.0));
        assert_eq!(weights.get("A"), None);
    }

    #[rstest]
    fn earlier_weights_win() {
        let first = MetricTable::from_rows([("R1", vec![("A", 1.0)])])
            .and_then(|t| t.with_weight("A", 2.0))
            .expect("first");
        let second = MetricTable::from_rows([("R1", vec![("A", 1.0), ("B", 1.0)])])
            .and_then(|t| t.with_weight("A", 9.0))
            .and_then(|t| t.with_weight("B", 3.0))
            .expect("second");

        let merged = merge_tables([first, second]).expect("merge");
        let weights = merged.weight_vector();
        assert_eq!(weights.weight("A"), 2.0);
        assert_eq!(weights.weight("B"), 3.0);
    }

    #[rstest]
    fn preserves_first_seen_order() {
        let first = MetricTable::from_rows([("R2", vec![("B", 1.0)])]).expect("first");
        let second =
            MetricTable::from_rows([("R1", vec![("A", 1.0)]), ("R2", vec![("C", 1.0)])])
                .expect("second");

        let merged = merge_tables([first, second]).expect("merge");
        assert_eq!(merged.routes().collect::<Vec<_>>(), ["R2", "R1"]);
        assert_eq!(merged.metrics(), ["B", "A", "C"]);
    }
}
