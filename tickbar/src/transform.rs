use core::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tickbar_core::timeseries::util::shift_values;
use tickbar_core::{Column, FrequencyFilter, TickbarError, TimeSeriesTable, resolve_indices};

/// Signature of a caller-supplied table transform.
pub type CustomFn = dyn Fn(&TimeSeriesTable) -> Result<TimeSeriesTable, TickbarError> + Send + Sync;

/// One table-to-table operation understood by [`crate::DataProcessor::apply`].
///
/// Every variant is pure: it reads the current table and produces a new one.
#[derive(Clone)]
#[non_exhaustive]
pub enum Transform {
    /// Keep the rows at the timestamps resolved from the filter's anchor grid.
    /// Every row sharing a resolved timestamp is kept.
    Frequency(FrequencyFilter),
    /// Keep rows whose time of day is within `[start, end]`; wraps past
    /// midnight when `start > end`.
    BetweenTime {
        /// Window open.
        start: NaiveTime,
        /// Window close.
        end: NaiveTime,
    },
    /// Keep rows with `start <= timestamp <= end`.
    Range {
        /// First timestamp kept.
        start: DateTime<Utc>,
        /// Last timestamp kept.
        end: DateTime<Utc>,
    },
    /// Keep rows where `column` is strictly positive. Missing values are dropped.
    PositiveColumn {
        /// Numeric column to test.
        column: String,
    },
    /// Rename `from[i]` to `to[i]`.
    RenameColumns {
        /// Existing names.
        from: Vec<String>,
        /// Replacement names, same length as `from`.
        to: Vec<String>,
    },
    /// Add `new` as `source` shifted by `shift` rows (positive lags, negative
    /// leads), filling vacated rows with the missing sentinel.
    ShiftToNewColumn {
        /// Name of the added column.
        new: String,
        /// Numeric column to shift.
        source: String,
        /// Row offset.
        shift: i64,
    },
    /// Arbitrary transform.
    Custom(Arc<CustomFn>),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency(filter) => f.debug_tuple("Frequency").field(filter).finish(),
            Self::BetweenTime { start, end } => f
                .debug_struct("BetweenTime")
                .field("start", start)
                .field("end", end)
                .finish(),
            Self::Range { start, end } => f
                .debug_struct("Range")
                .field("start", start)
                .field("end", end)
                .finish(),
            Self::PositiveColumn { column } => f
                .debug_struct("PositiveColumn")
                .field("column", column)
                .finish(),
            Self::RenameColumns { from, to } => f
                .debug_struct("RenameColumns")
                .field("from", from)
                .field("to", to)
                .finish(),
            Self::ShiftToNewColumn { new, source, shift } => f
                .debug_struct("ShiftToNewColumn")
                .field("new", new)
                .field("source", source)
                .field("shift", shift)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Transform {
    /// Wrap a closure as [`Transform::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&TimeSeriesTable) -> Result<TimeSeriesTable, TickbarError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Frequency(_) => "frequency",
            Self::BetweenTime { .. } => "between_time",
            Self::Range { .. } => "range",
            Self::PositiveColumn { .. } => "positive_column",
            Self::RenameColumns { .. } => "rename_columns",
            Self::ShiftToNewColumn { .. } => "shift_to_new_column",
            Self::Custom(_) => "custom",
        }
    }

    /// Run the transform against `table`.
    ///
    /// # Errors
    /// - `TickbarError::InvalidConfiguration` for a filter that cannot build a
    ///   grid, or rename lists of different lengths.
    /// - `TickbarError::UnknownColumn` / `TickbarError::ResultTypeMismatch`
    ///   when a named column is absent or not numeric.
    /// - `TickbarError::DuplicateColumn` when a rename collides.
    /// - Whatever a custom transform returns.
    pub fn run(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable, TickbarError> {
        match self {
            Self::Frequency(filter) => {
                let resolved = resolve_indices(table.index(), filter)?.resolved;
                Ok(table.rows_at(&resolved))
            }
            Self::BetweenTime { start, end } => Ok(table.between_time(*start, *end)),
            Self::Range { start, end } => Ok(table.slice_between(*start, *end)),
            Self::PositiveColumn { column } => {
                let values = table.float_column(column)?;
                Ok(table.filter_rows(|i| values[i] > 0.0))
            }
            Self::RenameColumns { from, to } => table.rename_columns(from, to),
            Self::ShiftToNewColumn { new, source, shift } => {
                let shifted = shift_values(table.float_column(source)?, *shift);
                table.with_column(Column::float(new.clone(), shifted))
            }
            Self::Custom(f) => f(table),
        }
    }
}
