//! CSV output for ranked tables and extracted metric batches.

use std::io::Write;

use camino::Utf8Path;
use csv::Writer;
use log::info;
use marathon_core::{MetricTable, RankedTable, WEIGHT_ROW};
use marathon_fs::create_utf8_file;

use crate::WriteError;

/// Header of the index column in every table this crate writes.
pub const ROUTE_HEADER: &str = "Route";

/// Write `ranked` as CSV: `Route`, one weighted rank column per metric, then
/// `Overall Weighted Score`. Missing cells are left empty.
///
/// # Examples
/// ```
/// use marathon_core::{DirectionSet, MetricTable};
/// use marathon_data::write_ranked_table;
/// use marathon_scorer::rank_routes;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = MetricTable::new().with_value("R1", "A", 4.0)?;
/// let ranked = rank_routes(&table, &DirectionSet::empty())?;
/// let mut out = Vec::new();
/// write_ranked_table(&mut out, &ranked)?;
/// assert_eq!(
///     String::from_utf8(out)?,
///     "Route,A Weighted Rank,Overall Weighted Score\nR1,1.0,1.0\n"
/// );
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns the CSV error raised while encoding or flushing.
pub fn write_ranked_table<W: Write>(writer: W, ranked: &RankedTable) -> Result<(), csv::Error> {
    let mut out = Writer::from_writer(writer);
    out.write_record(std::iter::once(ROUTE_HEADER.to_owned()).chain(ranked.columns()))?;
    for row in ranked.rows() {
        let ranks = ranked
            .metrics()
            .iter()
            .map(|metric| format_cell(row.weighted_rank(metric)));
        out.write_record(
            std::iter::once(row.route().to_owned())
                .chain(ranks)
                .chain(std::iter::once(format_cell(row.overall_score()))),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write `ranked` to the file at `path`, creating parent directories.
///
/// # Errors
/// Returns [`WriteError`] when the file cannot be created or written.
pub fn write_ranked_file(path: &Utf8Path, ranked: &RankedTable) -> Result<(), WriteError> {
    let file = create_file(path)?;
    write_ranked_table(file, ranked).map_err(|source| WriteError::Encode {
        source,
        path: path.to_path_buf(),
    })?;
    info!("wrote {} ranked routes to {path}", ranked.len());
    Ok(())
}

/// Write `table` in the route-per-row layout read back by
/// [`parse_metric_table`](crate::parse_metric_table).
///
/// A `weight` row is appended when the table carries one.
///
/// # Errors
/// Returns the CSV error raised while encoding or flushing.
pub fn write_metric_table<W: Write>(writer: W, table: &MetricTable) -> Result<(), csv::Error> {
    let mut out = Writer::from_writer(writer);
    out.write_record(
        std::iter::once(ROUTE_HEADER).chain(table.metrics().iter().map(String::as_str)),
    )?;
    for row in table.rows() {
        let cells = table
            .metrics()
            .iter()
            .map(|metric| format_cell(row.value(metric)));
        out.write_record(std::iter::once(row.route().to_owned()).chain(cells))?;
    }
    if let Some(weights) = table.weights() {
        let cells = table
            .metrics()
            .iter()
            .map(|metric| format_cell(weights.get(metric)));
        out.write_record(std::iter::once(WEIGHT_ROW.to_owned()).chain(cells))?;
    }
    out.flush()?;
    Ok(())
}

/// Write `table` to the file at `path`, creating parent directories.
///
/// # Errors
/// Returns [`WriteError`] when the file cannot be created or written.
pub fn write_metric_file(path: &Utf8Path, table: &MetricTable) -> Result<(), WriteError> {
    let file = create_file(path)?;
    write_metric_table(file, table).map_err(|source| WriteError::Encode {
        source,
        path: path.to_path_buf(),
    })?;
    info!("wrote metrics for {} routes to {path}", table.route_count());
    Ok(())
}

fn create_file(path: &Utf8Path) -> Result<impl Write, WriteError> {
    create_utf8_file(path).map_err(|source| WriteError::Create {
        source,
        path: path.to_path_buf(),
    })
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|present| format!("{present:?}")).unwrap_or_default()
}
