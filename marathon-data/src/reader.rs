//! CSV metric table loading.

use std::io::{Read, read_to_string};

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use marathon_core::{MetricTable, TableError, is_weight_key, merge_tables};
use marathon_fs::open_utf8_file;

use crate::{LoadError, TableLayout};

/// Parse one CSV metric table from `reader`.
///
/// Empty cells and `NaN` are missing values, never zero. The reserved
/// `weight` row (or column, in the [`TableLayout::Metrics`] orientation)
/// supplies per-metric weights.
///
/// # Examples
/// ```
/// use marathon_data::{TableLayout, parse_metric_table};
///
/// # fn main() -> Result<(), marathon_core::TableError> {
/// let csv = "Route,A,B\nR1,10,\nR2,20,7\nweight,1,2\n";
/// let table = parse_metric_table(csv.as_bytes(), TableLayout::Auto)?;
/// assert_eq!(table.value("R1", "B"), None);
/// assert_eq!(table.weight_vector().weight("B"), 2.0);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns [`TableError`] when the input is not a rectangular route by
/// metric table: ragged rows, blank or duplicate headers, duplicate routes
/// or metrics, unparsable numbers, or invalid weights.
pub fn parse_metric_table<R: Read>(reader: R, layout: TableLayout) -> Result<MetricTable, TableError> {
    let mut source = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let records = source
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()
        .map_err(|err| malformed(format!("invalid CSV: {err}")))?;
    let (header, body) = records
        .split_first()
        .ok_or_else(|| malformed("table has no header row"))?;
    let (index_label, keys) = split_record(header, true)?;
    let width = header.len();
    for (offset, record) in body.iter().enumerate() {
        if record.len() != width {
            return Err(malformed(format!(
                "row {} has {} cells, expected {width}",
                offset + 2,
                record.len()
            )));
        }
    }
    match layout.resolve(index_label) {
        TableLayout::Metrics => parse_metric_rows(&keys, body),
        TableLayout::Routes | TableLayout::Auto => parse_route_rows(&keys, body),
    }
}

/// Read and parse the CSV metric table stored at `path`.
///
/// # Errors
/// Returns [`LoadError::Read`] when the file cannot be read and
/// [`LoadError::Malformed`] when its contents are not a metric table.
pub fn read_metric_table(path: &Utf8Path, layout: TableLayout) -> Result<MetricTable, LoadError> {
    let contents = open_utf8_file(path)
        .and_then(read_to_string)
        .map_err(|source| LoadError::Read {
            source,
            path: path.to_path_buf(),
        })?;
    let table = parse_metric_table(contents.as_bytes(), layout).map_err(|source| {
        LoadError::Malformed {
            source,
            path: path.to_path_buf(),
        }
    })?;
    debug!(
        "loaded {path}: {} routes, {} metrics",
        table.route_count(),
        table.metric_count()
    );
    Ok(table)
}

/// Load every table in `paths` and merge them in the given order.
///
/// Earlier tables win where cells overlap; later tables only fill gaps.
///
/// # Errors
/// Returns [`LoadError::NoInput`] for an empty path list, and the first
/// load failure otherwise. No partial table is returned.
pub fn read_metric_tables(
    paths: &[Utf8PathBuf],
    layout: TableLayout,
) -> Result<MetricTable, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInput);
    }
    let tables = paths
        .iter()
        .map(|path| read_metric_table(path, layout))
        .collect::<Result<Vec<_>, _>>()?;
    let merged = merge_tables(tables).map_err(|source| LoadError::Merge { source })?;
    info!(
        "merged {} tables into {} routes across {} metrics",
        paths.len(),
        merged.route_count(),
        merged.metric_count()
    );
    Ok(merged)
}

fn parse_route_rows(metrics: &[&str], body: &[StringRecord]) -> Result<MetricTable, TableError> {
    let mut table = MetricTable::new();
    for metric in metrics {
        if table.has_metric(metric) {
            return Err(TableError::DuplicateMetric {
                metric: (*metric).to_owned(),
            });
        }
        table.insert_metric(metric)?;
    }
    let mut seen_weights = false;
    for record in body {
        let (key, cells) = split_record(record, false)?;
        if is_weight_key(key) {
            if seen_weights {
                return Err(malformed("more than one weight row"));
            }
            seen_weights = true;
            table.ensure_weight_row();
            for (metric, cell) in metrics.iter().zip(cells) {
                if let Some(weight) = parse_cell(cell, key, metric)? {
                    table.set_weight(metric, weight)?;
                }
            }
            continue;
        }
        if table.row(key).is_some() {
            return Err(TableError::DuplicateRoute {
                route: key.to_owned(),
            });
        }
        table.insert_route(key)?;
        for (metric, cell) in metrics.iter().zip(cells) {
            table.set_value(key, metric, parse_cell(cell, key, metric)?)?;
        }
    }
    Ok(table)
}

fn parse_metric_rows(columns: &[&str], body: &[StringRecord]) -> Result<MetricTable, TableError> {
    let mut table = MetricTable::new();
    let mut weight_column = None;
    for (position, column) in columns.iter().enumerate() {
        if is_weight_key(column) {
            if weight_column.is_some() {
                return Err(malformed("more than one weight column"));
            }
            weight_column = Some(position);
            table.ensure_weight_row();
        } else if table.row(column).is_some() {
            return Err(TableError::DuplicateRoute {
                route: (*column).to_owned(),
            });
        } else {
            table.insert_route(column)?;
        }
    }
    for record in body {
        let (metric, cells) = split_record(record, false)?;
        if table.has_metric(metric) {
            return Err(TableError::DuplicateMetric {
                metric: metric.to_owned(),
            });
        }
        table.insert_metric(metric)?;
        for (position, (column, cell)) in columns.iter().zip(cells).enumerate() {
            let value = parse_cell(cell, column, metric)?;
            if weight_column == Some(position) {
                if let Some(weight) = value {
                    table.set_weight(metric, weight)?;
                }
            } else {
                table.set_value(column, metric, value)?;
            }
        }
    }
    Ok(table)
}

/// Split a record into its index cell and the remaining cells.
///
/// Header rows may leave the index cell blank but no other cell; body rows
/// must name their route or metric.
fn split_record(record: &StringRecord, is_header: bool) -> Result<(&str, Vec<&str>), TableError> {
    let mut cells = record.iter();
    let key = cells.next().ok_or_else(|| malformed("row has no cells"))?;
    let rest: Vec<&str> = cells.collect();
    if is_header && rest.iter().any(|cell| cell.is_empty()) {
        return Err(malformed("header contains a blank column name"));
    }
    if !is_header && key.is_empty() {
        return Err(malformed("row is missing its identifier"));
    }
    Ok((key, rest))
}

fn parse_cell(cell: &str, row: &str, column: &str) -> Result<Option<f64>, TableError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        malformed(format!(
            "cell ({row}, {column}) holds {cell:?}, which is not a number"
        ))
    })
}

fn malformed(reason: impl Into<String>) -> TableError {
    TableError::Malformed {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(csv: &str) -> Result<MetricTable, TableError> {
        parse_metric_table(csv.as_bytes(), TableLayout::Auto)
    }

    #[rstest]
    fn reads_route_layout_with_weights() {
        let table = parse("Route,A,B\nR1,10,5\nR2,, 7\nweight,1,2\n").expect("parse table");

        assert_eq!(table.routes().collect::<Vec<_>>(), ["R1", "R2"]);
        assert_eq!(table.metrics(), ["A", "B"]);
        assert_eq!(table.value("R2", "A"), None);
        assert_eq!(table.value("R2", "B"), Some(7.0));
        assert_eq!(table.weight_vector().weight("B"), 2.0);
    }

    #[rstest]
    fn reads_metric_layout_with_weight_column() {
        let table =
            parse("Metric,R1,R2,Weight\nA,10,20,1\nB,5,NaN,2\n").expect("parse table");

        assert_eq!(table.routes().collect::<Vec<_>>(), ["R1", "R2"]);
        assert_eq!(table.metrics(), ["A", "B"]);
        assert_eq!(table.value("R1", "B"), Some(5.0));
        assert_eq!(table.value("R2", "B"), None);
        assert_eq!(table.weights().and_then(|row| row.get("B")), Some(2.0));
    }

    #[rstest]
    fn layouts_describe_the_same_table() {
        let by_route = parse("Route,A,B\nR1,10,5\nR2,20,\n").expect("route layout");
        let by_metric = parse("Metrics,R1,R2\nA,10,20\nB,5,\n").expect("metric layout");
        assert_eq!(by_route, by_metric);
    }

    #[rstest]
    fn forced_layout_overrides_detection() {
        let table = parse_metric_table("Metric,A\nR1,3\n".as_bytes(), TableLayout::Routes)
            .expect("parse table");
        assert_eq!(table.value("R1", "A"), Some(3.0));
    }

    #[rstest]
    fn absent_weight_row_is_preserved() {
        let table = parse("Route,A\nR1,1\n").expect("parse table");
        assert!(table.weights().is_none());
    }

    #[rstest]
    #[case::empty("")]
    #[case::ragged("Route,A,B\nR1,1\n")]
    #[case::blank_metric("Route,A,\nR1,1,2\n")]
    #[case::blank_route("Route,A\n,1\n")]
    #[case::not_a_number("Route,A\nR1,ten\n")]
    #[case::two_weight_rows("Route,A\nweight,1\nWeight,2\n")]
    fn rejects_malformed_tables(#[case] csv: &str) {
        let err = parse(csv).expect_err("table should be rejected");
        assert!(
            matches!(err, TableError::Malformed { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    fn rejects_duplicate_routes_and_metrics() {
        assert_eq!(
            parse("Route,A\nR1,1\nR1,2\n").expect_err("duplicate route"),
            TableError::DuplicateRoute {
                route: "R1".to_owned()
            }
        );
        assert_eq!(
            parse("Route,A,A\nR1,1,2\n").expect_err("duplicate metric"),
            TableError::DuplicateMetric {
                metric: "A".to_owned()
            }
        );
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    fn rejects_non_positive_weights(#[case] weight: &str) {
        let err = parse(&format!("Route,A\nR1,1\nweight,{weight}\n"))
            .expect_err("weight should be rejected");
        assert!(matches!(err, TableError::InvalidWeight { .. }));
    }
}
