//! Time-indexed column table.
//!
//! A [`TimeSeriesTable`] is an ordered timestamp index (duplicates allowed)
//! plus named columns of equal length. Every operation returns a new table;
//! nothing mutates a table in place once it has been built.

use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tickbar_types::{ColumnSelection, TickbarError};

/// Missing-value sentinel stored in float columns.
pub const MISSING: f64 = f64::NAN;

/// True if `v` is the missing-value sentinel.
#[must_use]
pub const fn is_missing(v: f64) -> bool {
    v.is_nan()
}

/// Values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Numeric observations; [`MISSING`] marks absent values.
    Float(Vec<f64>),
    /// Timestamp metadata, such as interval boundaries.
    Timestamp(Vec<DateTime<Utc>>),
}

impl ColumnData {
    /// Number of values.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Timestamp(v) => v.len(),
        }
    }

    /// True if the column holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Float values, or `None` for a timestamp column.
    #[must_use]
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Timestamp(_) => None,
        }
    }

    /// Timestamp values, or `None` for a float column.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&[DateTime<Utc>]> {
        match self {
            Self::Float(_) => None,
            Self::Timestamp(v) => Some(v),
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        match self {
            Self::Float(v) => Self::Float(rows.iter().map(|&i| v[i]).collect()),
            Self::Timestamp(v) => Self::Timestamp(rows.iter().map(|&i| v[i]).collect()),
        }
    }

    fn slice(&self, lo: usize, hi: usize) -> Self {
        match self {
            Self::Float(v) => Self::Float(v[lo..hi].to_vec()),
            Self::Timestamp(v) => Self::Timestamp(v[lo..hi].to_vec()),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name; unique within a table.
    pub name: String,
    /// Column values, one per index entry.
    pub data: ColumnData,
}

impl Column {
    /// Build a float column.
    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Float(values),
        }
    }

    /// Build a timestamp column.
    pub fn timestamp(name: impl Into<String>, values: Vec<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Timestamp(values),
        }
    }
}

/// Observations keyed by a (possibly repeated) timestamp index.
///
/// Deserialisation goes through [`TimeSeriesTable::new`], so a decoded table
/// satisfies the same shape checks as one built in code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct TimeSeriesTable {
    #[serde(default)]
    index_name: Option<String>,
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

// Unchecked wire shape of `TimeSeriesTable`.
#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    index_name: Option<String>,
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl TryFrom<RawTable> for TimeSeriesTable {
    type Error = TickbarError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let mut table = Self::new(raw.index, raw.columns)?;
        table.index_name = raw.index_name;
        Ok(table)
    }
}

impl TimeSeriesTable {
    /// Build a table from an index and columns.
    ///
    /// The index does not need to be sorted; see [`Self::sorted_by_time`].
    ///
    /// # Errors
    /// - `TickbarError::Data` if a column length differs from the index length.
    /// - `TickbarError::DuplicateColumn` if two columns share a name.
    pub fn new(index: Vec<DateTime<Utc>>, columns: Vec<Column>) -> Result<Self, TickbarError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if c.data.len() != index.len() {
                return Err(TickbarError::Data(format!(
                    "column '{}' has {} values but the index has {}",
                    c.name,
                    c.data.len(),
                    index.len()
                )));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(TickbarError::duplicate_column(c.name.clone()));
            }
        }
        Ok(Self {
            index_name: None,
            index,
            columns,
        })
    }

    /// Build a table whose columns are all numeric.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn from_float_columns<S>(
        index: Vec<DateTime<Utc>>,
        columns: impl IntoIterator<Item = (S, Vec<f64>)>,
    ) -> Result<Self, TickbarError>
    where
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column::float(name, values))
            .collect();
        Self::new(index, columns)
    }

    /// Attach a name to the index.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Name of the index, if one was set.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Timestamp index in row order.
    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// All columns in table order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.index.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up a column by name.
    ///
    /// # Errors
    /// Returns `TickbarError::UnknownColumn` if no column has that name.
    pub fn column(&self, name: &str) -> Result<&Column, TickbarError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TickbarError::unknown_column(name))
    }

    /// Float values of a column.
    ///
    /// # Errors
    /// - `TickbarError::UnknownColumn` if the column does not exist.
    /// - `TickbarError::ResultTypeMismatch` if the column holds timestamps.
    pub fn float_column(&self, name: &str) -> Result<&[f64], TickbarError> {
        self.column(name)?.data.as_float().ok_or_else(|| {
            TickbarError::result_type_mismatch(format!("column '{name}' is not numeric"))
        })
    }

    /// True if the index is ascending (ties allowed).
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.index.is_sorted()
    }

    /// Stable sort of rows by timestamp; rows sharing a timestamp keep their
    /// relative order.
    #[must_use]
    pub fn sorted_by_time(self) -> Self {
        if self.is_sorted() {
            return self;
        }
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);
        self.take(&order)
    }

    /// Distinct timestamps of the index in ascending order.
    #[must_use]
    pub fn unique_index(&self) -> Vec<DateTime<Utc>> {
        crate::timeseries::util::unique_axis(&self.index)
    }

    /// Rows whose timestamp lies in `[start, end]`, both ends inclusive.
    ///
    /// Assumes the index is sorted. Returns an empty table if `start > end`.
    #[must_use]
    pub fn slice_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let lo = self.index.partition_point(|t| *t < start);
        let hi = self.index.partition_point(|t| *t <= end).max(lo);
        Self {
            index_name: self.index_name.clone(),
            index: self.index[lo..hi].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.slice(lo, hi),
                })
                .collect(),
        }
    }

    /// Keep only the selected columns, in selection order.
    ///
    /// # Errors
    /// - `TickbarError::UnknownColumn` if a selected column does not exist.
    /// - `TickbarError::DuplicateColumn` if a column is selected twice.
    pub fn select(&self, selection: &ColumnSelection) -> Result<Self, TickbarError> {
        let ColumnSelection::Only(names) = selection else {
            return Ok(self.clone());
        };
        let columns = names
            .iter()
            .map(|n| self.column(n).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = Self::new(self.index.clone(), columns)?;
        out.index_name.clone_from(&self.index_name);
        Ok(out)
    }

    /// Rows at the given positions, in the given order.
    #[must_use]
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            index_name: self.index_name.clone(),
            index: rows.iter().map(|&i| self.index[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.take(rows),
                })
                .collect(),
        }
    }

    /// Rows for which `keep` returns true, given the row position.
    #[must_use]
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        self.take(&rows)
    }

    /// Every row whose timestamp appears in `timestamps`, duplicates included.
    #[must_use]
    pub fn rows_at(&self, timestamps: &[DateTime<Utc>]) -> Self {
        let wanted: HashSet<DateTime<Utc>> = timestamps.iter().copied().collect();
        self.filter_rows(|i| wanted.contains(&self.index[i]))
    }

    /// Rows whose time of day lies in `[start, end]`.
    ///
    /// When `start > end` the window wraps past midnight.
    #[must_use]
    pub fn between_time(&self, start: NaiveTime, end: NaiveTime) -> Self {
        self.filter_rows(|i| {
            let t = self.index[i].time();
            if start <= end {
                start <= t && t <= end
            } else {
                t >= start || t <= end
            }
        })
    }

    /// Add a column, or replace the column of the same name.
    ///
    /// # Errors
    /// Returns `TickbarError::Data` if the column length differs from the index.
    pub fn with_column(&self, column: Column) -> Result<Self, TickbarError> {
        if column.data.len() != self.len() {
            return Err(TickbarError::Data(format!(
                "column '{}' has {} values but the index has {}",
                column.name,
                column.data.len(),
                self.len()
            )));
        }
        let mut out = self.clone();
        match out.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => out.columns.push(column),
        }
        Ok(out)
    }

    /// Rename columns pairwise; names not listed in `from` are kept.
    ///
    /// # Errors
    /// - `TickbarError::InvalidConfiguration` if `from` and `to` differ in length.
    /// - `TickbarError::DuplicateColumn` if renaming produces two equal names.
    pub fn rename_columns<S, T>(&self, from: &[S], to: &[T]) -> Result<Self, TickbarError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        if from.len() != to.len() {
            return Err(TickbarError::invalid_configuration(format!(
                "cannot rename {} columns to {} names",
                from.len(),
                to.len()
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name = from
                    .iter()
                    .position(|f| f.as_ref() == c.name)
                    .map_or_else(|| c.name.clone(), |i| to[i].as_ref().to_string());
                Column {
                    name,
                    data: c.data.clone(),
                }
            })
            .collect();
        let mut out = Self::new(self.index.clone(), columns)?;
        out.index_name.clone_from(&self.index_name);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(sec: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(sec, 0).unwrap()
    }

    fn table(ts: &[i64], vals: &[f64]) -> TimeSeriesTable {
        TimeSeriesTable::from_float_columns(
            ts.iter().copied().map(t).collect(),
            [("v", vals.to_vec())],
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = TimeSeriesTable::from_float_columns(vec![t(0), t(1)], [("v", vec![1.0])])
            .unwrap_err();
        assert!(matches!(err, TickbarError::Data(_)));
    }

    #[test]
    fn sort_is_stable_for_duplicate_timestamps() {
        let tbl = table(&[5, 1, 5, 3], &[1.0, 2.0, 3.0, 4.0]).sorted_by_time();
        assert_eq!(tbl.index(), &[t(1), t(3), t(5), t(5)]);
        assert_eq!(tbl.float_column("v").unwrap(), &[2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn slice_between_is_inclusive() {
        let tbl = table(&[0, 60, 120, 120, 180], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let s = tbl.slice_between(t(60), t(120));
        assert_eq!(s.float_column("v").unwrap(), &[2.0, 3.0, 4.0]);
        assert!(tbl.slice_between(t(121), t(179)).is_empty());
        assert!(tbl.slice_between(t(180), t(0)).is_empty());
    }

    #[test]
    fn rows_at_keeps_duplicates() {
        let tbl = table(&[0, 60, 60, 120], &[1.0, 2.0, 3.0, 4.0]);
        let r = tbl.rows_at(&[t(60), t(120)]);
        assert_eq!(r.float_column("v").unwrap(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn rename_length_mismatch_is_configuration_error() {
        let tbl = table(&[0], &[1.0]);
        let err = tbl.rename_columns(&["v"], &["a", "b"]).unwrap_err();
        assert!(err.is_configuration());
        let renamed = tbl.rename_columns(&["v"], &["Return"]).unwrap();
        assert_eq!(renamed.column_names().collect::<Vec<_>>(), vec!["Return"]);
    }
}
