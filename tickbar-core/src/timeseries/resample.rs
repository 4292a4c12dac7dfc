//! Summarise a table over the intervals of a resolved anchor grid.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use tickbar_types::{ColumnSelection, FrequencyFilter, TickbarError};

use super::aggregate::{Aggregation, output_names, stack_rows, summarize};
use super::partition::partition;
use super::resolve::resolve_indices;
use crate::table::{Column, TimeSeriesTable};

/// Index name of a summary table: the start boundary of each interval.
pub const START_PERIOD: &str = "Start_Period";
/// Metadata column of a summary table: the end boundary of each interval.
pub const END_PERIOD: &str = "End_Period";

/// Resample `table` onto the grid described by `filter` and summarise each
/// interval with `aggregations`.
///
/// The table is sorted by time first (it is not modified). Anchors are
/// generated and resolved to observed timestamps, consecutive resolved
/// timestamps form inclusive intervals, and each interval's slice of the
/// selected columns becomes one row. The result has one float column per
/// output name, an [`END_PERIOD`] timestamp column, and is indexed by
/// [`START_PERIOD`]. Rows follow interval order.
///
/// Fewer than two resolved boundaries (including an empty table) give an
/// empty table that still carries the output columns.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use tickbar_core::{Aggregation, FrequencyFilter, Period, TimeSeriesTable, summarize_intervals};
/// use tickbar_core::ColumnSelection;
///
/// let index: Vec<DateTime<Utc>> = (0..10).map(|m| DateTime::from_timestamp(m * 60, 0).unwrap()).collect();
/// let table = TimeSeriesTable::from_float_columns(index, [("Return", (1..=10).map(f64::from).collect())]).unwrap();
/// let filter = FrequencyFilter::new(Period::Minute).length(2);
/// let out = summarize_intervals(&table, &filter, &[Aggregation::first(), Aggregation::max()], &ColumnSelection::All, None::<&[&str]>).unwrap();
/// assert_eq!(out.len(), 4);
/// assert_eq!(out.float_column("max").unwrap()[0], 3.0);
/// ```
///
/// # Errors
/// - `TickbarError::InvalidConfiguration` if `filter` cannot generate a grid.
/// - `TickbarError::ConfigurationMismatch`
///   or `TickbarError::DuplicateColumn` for bad aggregation/name lists.
/// - `TickbarError::UnknownColumn` if a selected column does not exist.
/// - `TickbarError::ResultTypeMismatch` if a selected column is not numeric
///   or rows cannot be stacked into one table.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tickbar_core::resample::summarize_intervals",
        level = "debug",
        skip(table, aggregations, names),
        fields(rows = table.len(), functions = aggregations.len()),
    )
)]
pub fn summarize_intervals<S: AsRef<str>>(
    table: &TimeSeriesTable,
    filter: &FrequencyFilter,
    aggregations: &[Aggregation],
    columns: &ColumnSelection,
    names: Option<&[S]>,
) -> Result<TimeSeriesTable, TickbarError> {
    let sorted: Cow<'_, TimeSeriesTable> = if table.is_sorted() {
        Cow::Borrowed(table)
    } else {
        Cow::Owned(table.clone().sorted_by_time())
    };
    let data = sorted.select(columns)?;
    let data_columns: Vec<&str> = data.column_names().collect();
    if data_columns.is_empty() {
        return Err(TickbarError::result_type_mismatch(
            "no data columns to aggregate",
        ));
    }
    let headers = output_names(aggregations, names, &data_columns)?;
    if headers.iter().any(|h| h == END_PERIOD) {
        return Err(TickbarError::duplicate_column(END_PERIOD));
    }
    for c in &data_columns {
        data.float_column(c)?;
    }

    let filter = filter.clone().return_fixed_indices(true);
    let indices = resolve_indices(data.index(), &filter)?;
    let intervals = partition(&indices.resolved);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        anchors = indices.fixed.as_ref().map_or(0, Vec::len),
        boundaries = indices.resolved.len(),
        intervals = intervals.len(),
        "partitioned resolved boundaries"
    );

    if intervals.is_empty() {
        return empty_summary(headers);
    }

    let rows = intervals
        .iter()
        .map(|iv| summarize(&data.slice_between(iv.start, iv.end), aggregations, names))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "tracing")]
    tracing::trace!(
        empty = rows.iter().filter(|r| r.is_all_missing()).count(),
        "summarised intervals"
    );

    let starts: Vec<DateTime<Utc>> = intervals.iter().map(|iv| iv.start).collect();
    let ends: Vec<DateTime<Utc>> = intervals.iter().map(|iv| iv.end).collect();
    let mut out: Vec<Column> = stack_rows(&rows)?
        .into_iter()
        .map(|(name, values)| Column::float(name, values))
        .collect();
    out.push(Column::timestamp(END_PERIOD, ends));

    TimeSeriesTable::new(starts, out)
        .map(|t| t.with_index_name(START_PERIOD))
        .map_err(|e| TickbarError::result_type_mismatch(e.to_string()))
}

fn empty_summary(headers: Vec<String>) -> Result<TimeSeriesTable, TickbarError> {
    let mut columns: Vec<Column> = headers
        .into_iter()
        .map(|name| Column::float(name, Vec::new()))
        .collect();
    columns.push(Column::timestamp(END_PERIOD, Vec::new()));
    Ok(TimeSeriesTable::new(Vec::new(), columns)?.with_index_name(START_PERIOD))
}
