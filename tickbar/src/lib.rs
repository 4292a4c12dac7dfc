//! tickbar turns irregularly time-stamped observations into fixed-frequency
//! summary bars.
//!
//! Overview
//! - An anchor grid is generated from a calendar period and a step length.
//! - Each anchor snaps to an observed timestamp (as-of, backfill, or both).
//! - Consecutive snapped timestamps bound inclusive intervals; each interval
//!   is reduced to one row by named aggregation functions.
//! - [`DataProcessor`] chains table filters and summaries over one sorted table.
//!
//! Key behaviors
//! - An observation that lands exactly on a boundary is counted in both
//!   neighbouring bars.
//! - `Period::Continuous` skips the grid and uses every distinct timestamp as
//!   a boundary.
//! - Fewer than two boundaries give an empty summary that still carries the
//!   output columns.
//!
//! Examples
//! One-minute OHLC bars from ticks, trading hours only:
//! ```
//! use chrono::{DateTime, NaiveTime};
//! use tickbar::{Aggregation, ColumnSelection, DataProcessor, FrequencyFilter, Period, TimeSeriesTable};
//!
//! let index = (0..120).map(|s| DateTime::from_timestamp(1_584_090_000 + s * 15, 0).unwrap()).collect();
//! let px = (0..120).map(|i| 100.0 + f64::from(i % 7)).collect();
//! let table = TimeSeriesTable::from_float_columns(index, [("Px", px)])?;
//!
//! let bars = DataProcessor::new(table)
//!     .between_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap())?
//!     .summarize_intervals(
//!         &FrequencyFilter::new(Period::Minute),
//!         &Aggregation::ohlc(),
//!         &ColumnSelection::All,
//!         Some(&["Open", "High", "Low", "Close"][..]),
//!     )?
//!     .into_inner();
//! assert_eq!(bars.len(), 29);
//! # Ok::<(), tickbar::TickbarError>(())
//! ```
#![warn(missing_docs)]

mod processor;
mod transform;

pub use processor::DataProcessor;
pub use transform::{CustomFn, Transform};

pub use tickbar_core::{
    Aggregation, AggregationFn, AlignmentPolicy, Column, ColumnData, ColumnSelection, END_PERIOD,
    FrequencyFilter, Interval, MISSING, Period, ResolvedIndices, START_PERIOD, SummaryRow,
    TickbarError, TimeSeriesTable, anchor_grid, is_missing, partition, resolve_anchors,
    resolve_indices, summarize, summarize_intervals,
};
