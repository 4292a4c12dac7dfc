use chrono::{DateTime, NaiveTime, Utc};
use tickbar_core::{
    Aggregation, ColumnSelection, FrequencyFilter, TickbarError, TimeSeriesTable,
    summarize_intervals,
};

use crate::transform::Transform;

/// Chains table transforms and interval summaries over one time-sorted table.
///
/// Every step consumes the processor and returns a new one; the wrapped table
/// is never modified in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DataProcessor {
    table: TimeSeriesTable,
}

impl From<TimeSeriesTable> for DataProcessor {
    fn from(table: TimeSeriesTable) -> Self {
        Self::new(table)
    }
}

impl DataProcessor {
    /// Wrap `table`, sorting it by time (stable, so rows sharing a timestamp
    /// keep their order).
    #[must_use]
    pub fn new(table: TimeSeriesTable) -> Self {
        let table = if table.is_sorted() {
            table
        } else {
            table.sorted_by_time()
        };
        Self { table }
    }

    /// Borrow the current table.
    #[must_use]
    pub const fn table(&self) -> &TimeSeriesTable {
        &self.table
    }

    /// A copy of the current table.
    #[must_use]
    pub fn data(&self) -> TimeSeriesTable {
        self.table.clone()
    }

    /// Unwrap into the current table.
    #[must_use]
    pub fn into_inner(self) -> TimeSeriesTable {
        self.table
    }

    /// Apply one transform and wrap the result.
    ///
    /// # Errors
    /// Propagates the transform's error; see [`Transform::run`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickbar::processor::apply",
            level = "debug",
            skip(self, transform),
            fields(transform = transform.label(), rows = self.table.len()),
        )
    )]
    pub fn apply(self, transform: Transform) -> Result<Self, TickbarError> {
        let out = transform.run(&self.table)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(rows_out = out.len(), "transform applied");
        Ok(Self::new(out))
    }

    /// Summarise the table per interval of `filter`'s grid.
    ///
    /// `names`, when given, renames the aggregation outputs and must match
    /// `aggregations` in length.
    ///
    /// # Errors
    /// See [`tickbar_core::summarize_intervals`].
    pub fn summarize_intervals<S: AsRef<str>>(
        self,
        filter: &FrequencyFilter,
        aggregations: &[Aggregation],
        columns: &ColumnSelection,
        names: Option<&[S]>,
    ) -> Result<Self, TickbarError> {
        summarize_intervals(&self.table, filter, aggregations, columns, names).map(Self::new)
    }

    /// Keep rows at the timestamps resolved from `filter`.
    ///
    /// # Errors
    /// `TickbarError::InvalidConfiguration` if `filter` cannot build a grid.
    pub fn time_freq(self, filter: FrequencyFilter) -> Result<Self, TickbarError> {
        self.apply(Transform::Frequency(filter))
    }

    /// Keep rows whose time of day is within `[start, end]`.
    ///
    /// # Errors
    /// Never fails; returns `Result` for chaining symmetry.
    pub fn between_time(self, start: NaiveTime, end: NaiveTime) -> Result<Self, TickbarError> {
        self.apply(Transform::BetweenTime { start, end })
    }

    /// Keep rows between two timestamps, inclusive.
    ///
    /// # Errors
    /// Never fails; returns `Result` for chaining symmetry.
    pub fn index_range(
        self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, TickbarError> {
        self.apply(Transform::Range { start, end })
    }

    /// Keep rows where `column` is strictly positive.
    ///
    /// # Errors
    /// `TickbarError::UnknownColumn` or `TickbarError::ResultTypeMismatch`.
    pub fn positive_column(self, column: impl Into<String>) -> Result<Self, TickbarError> {
        self.apply(Transform::PositiveColumn {
            column: column.into(),
        })
    }

    /// Rename columns pairwise.
    ///
    /// # Errors
    /// `TickbarError::InvalidConfiguration` if the lists differ in length,
    /// `TickbarError::DuplicateColumn` if a rename collides.
    pub fn rename_columns<I, J, S, T>(self, from: I, to: J) -> Result<Self, TickbarError>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.apply(Transform::RenameColumns {
            from: from.into_iter().map(Into::into).collect(),
            to: to.into_iter().map(Into::into).collect(),
        })
    }

    /// Add `new` as `source` shifted by `shift` rows.
    ///
    /// # Errors
    /// `TickbarError::UnknownColumn` or `TickbarError::ResultTypeMismatch` for
    /// `source`.
    pub fn shift_to_new_column(
        self,
        new: impl Into<String>,
        source: impl Into<String>,
        shift: i64,
    ) -> Result<Self, TickbarError> {
        self.apply(Transform::ShiftToNewColumn {
            new: new.into(),
            source: source.into(),
            shift,
        })
    }
}
