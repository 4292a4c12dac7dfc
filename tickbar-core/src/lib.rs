//! tickbar-core
//!
//! Resample irregularly time-stamped observations onto a regular grid and
//! summarise each interval into one row ("OHLC bars from ticks").
//!
//! - `table`: the time-indexed column table every stage consumes and produces.
//! - `timeseries`: anchor grids, alignment, interval partitioning, aggregation,
//!   and the `summarize_intervals` pipeline.
//! - `types`: configuration and error types re-exported from `tickbar-types`.
//!
//! Every stage is a pure, synchronous function over immutable inputs. The
//! optional `parallel` feature evaluates independent aggregation functions on
//! the rayon pool; the optional `tracing` feature instruments the pipeline.
//!
#![warn(missing_docs)]

/// Time-indexed column table.
pub mod table;
/// Temporal indexing and interval summarisation.
pub mod timeseries;
pub mod types;

pub use table::{Column, ColumnData, MISSING, TimeSeriesTable, is_missing};
pub use timeseries::aggregate::{Aggregation, AggregationFn, SummaryRow, summarize};
pub use timeseries::grid::anchor_grid;
pub use timeseries::partition::{Interval, partition};
pub use timeseries::resample::{END_PERIOD, START_PERIOD, summarize_intervals};
pub use timeseries::resolve::{ResolvedIndices, resolve_anchors, resolve_indices};
pub use types::*;
