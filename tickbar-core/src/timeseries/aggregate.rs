//! Named aggregation functions and per-interval summary rows.
//!
//! An [`Aggregation`] pairs an output name with a `&[f64] -> f64` reduction.
//! [`summarize`] runs every aggregation over every selected column of one
//! interval slice and returns a single [`SummaryRow`]. Aggregations are
//! independent of each other; with the `parallel` feature they run on the
//! rayon pool, and results are always collected in declaration order.

use core::fmt;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tickbar_types::TickbarError;

use crate::table::{MISSING, TimeSeriesTable, is_missing};

/// Signature every aggregation function conforms to.
pub type AggregationFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// A reduction over one column of an interval, with a stable output name.
#[derive(Clone)]
pub struct Aggregation {
    name: String,
    func: Arc<AggregationFn>,
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Aggregation {
    /// Wrap a reduction under an output name.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Same reduction under a different output name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Output name of this aggregation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate over a column slice.
    #[must_use]
    pub fn apply(&self, values: &[f64]) -> f64 {
        (self.func)(values)
    }

    /// First value of the interval (open).
    #[must_use]
    pub fn first() -> Self {
        Self::new("first", |v| v.first().copied().unwrap_or(MISSING))
    }

    /// Last value of the interval (close).
    #[must_use]
    pub fn last() -> Self {
        Self::new("last", |v| v.last().copied().unwrap_or(MISSING))
    }

    /// Largest non-missing value (high).
    #[must_use]
    pub fn max() -> Self {
        Self::new("max", |v| present(v).reduce(f64::max).unwrap_or(MISSING))
    }

    /// Smallest non-missing value (low).
    #[must_use]
    pub fn min() -> Self {
        Self::new("min", |v| present(v).reduce(f64::min).unwrap_or(MISSING))
    }

    /// Sum of non-missing values.
    #[must_use]
    pub fn sum() -> Self {
        Self::new("sum", |v| present(v).sum())
    }

    /// Number of non-missing values.
    #[must_use]
    pub fn count() -> Self {
        Self::new("count", |v| count_f64(present(v).count()))
    }

    /// Arithmetic mean of non-missing values.
    #[must_use]
    pub fn mean() -> Self {
        Self::new("mean", mean)
    }

    /// Median of non-missing values.
    #[must_use]
    pub fn median() -> Self {
        Self::new("median", |v| {
            let mut xs: Vec<f64> = present(v).collect();
            if xs.is_empty() {
                return MISSING;
            }
            xs.sort_by(f64::total_cmp);
            let mid = xs.len() / 2;
            if xs.len() % 2 == 1 {
                xs[mid]
            } else {
                (xs[mid - 1] + xs[mid]) / 2.0
            }
        })
    }

    /// Population standard deviation (zero delta degrees of freedom) of
    /// non-missing values.
    #[must_use]
    pub fn std() -> Self {
        Self::new("std", |v| {
            let m = mean(v);
            if is_missing(m) {
                return MISSING;
            }
            let (sq, n) = present(v).fold((0.0, 0usize), |(sq, n), x| (sq + (x - m).powi(2), n + 1));
            (sq / count_f64(n)).sqrt()
        })
    }

    /// The usual open/high/low/close set: `first`, `max`, `min`, `last`.
    #[must_use]
    pub fn ohlc() -> Vec<Self> {
        vec![Self::first(), Self::max(), Self::min(), Self::last()]
    }
}

fn present(v: &[f64]) -> impl Iterator<Item = f64> + '_ {
    v.iter().copied().filter(|x| !is_missing(*x))
}

#[allow(clippy::cast_precision_loss)]
const fn count_f64(n: usize) -> f64 {
    n as f64
}

fn mean(v: &[f64]) -> f64 {
    let (sum, n) = present(v).fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 { MISSING } else { sum / count_f64(n) }
}

/// One summary row: named values in output-column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    names: Vec<String>,
    values: Vec<f64>,
}

impl SummaryRow {
    /// Output column names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values, aligned with [`Self::names`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value for an output column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// True if every value is the missing sentinel.
    #[must_use]
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| is_missing(*v))
    }
}

/// Stack rows into per-column value vectors.
///
/// # Errors
/// Returns `Err(TickbarError::ResultTypeMismatch)` if the rows do not all
/// carry the same output columns in the same order.
pub fn stack_rows(rows: &[SummaryRow]) -> Result<Vec<(String, Vec<f64>)>, TickbarError> {
    let Some(head) = rows.first() else {
        return Ok(Vec::new());
    };
    let mut columns: Vec<(String, Vec<f64>)> = head
        .names
        .iter()
        .map(|n| (n.clone(), Vec::with_capacity(rows.len())))
        .collect();
    for (i, row) in rows.iter().enumerate() {
        if row.names != head.names {
            return Err(TickbarError::result_type_mismatch(format!(
                "summary row {i} has columns {:?}, expected {:?}",
                row.names, head.names
            )));
        }
        for (col, &v) in columns.iter_mut().zip(&row.values) {
            col.1.push(v);
        }
    }
    Ok(columns)
}

/// Output column names for `aggregations` applied to `data_columns`.
///
/// With explicit `names`, their count must equal the aggregation count.
/// Without them, each aggregation's own name is used. When more than one data
/// column is aggregated, each output name is prefixed with `{column}_`.
///
/// # Errors
/// - `TickbarError::ConfigurationMismatch` if `aggregations` is empty or the
///   name count differs.
/// - `TickbarError::DuplicateColumn` if two outputs would share a name.
pub fn output_names<S: AsRef<str>>(
    aggregations: &[Aggregation],
    names: Option<&[S]>,
    data_columns: &[&str],
) -> Result<Vec<String>, TickbarError> {
    if aggregations.is_empty() {
        return Err(TickbarError::ConfigurationMismatch {
            functions: 0,
            names: names.map_or(0, <[S]>::len),
        });
    }
    let base: Vec<&str> = match names {
        Some(names) if names.len() != aggregations.len() => {
            return Err(TickbarError::ConfigurationMismatch {
                functions: aggregations.len(),
                names: names.len(),
            });
        }
        Some(names) => names.iter().map(AsRef::as_ref).collect(),
        None => aggregations.iter().map(Aggregation::name).collect(),
    };

    let out: Vec<String> = if data_columns.len() == 1 {
        base.iter().map(|b| (*b).to_string()).collect()
    } else {
        data_columns
            .iter()
            .flat_map(|c| base.iter().map(move |b| format!("{c}_{b}")))
            .collect()
    };

    let mut seen = HashSet::with_capacity(out.len());
    for n in &out {
        if !seen.insert(n.as_str()) {
            return Err(TickbarError::duplicate_column(n.clone()));
        }
    }
    Ok(out)
}

/// Summarise one interval slice into a single row.
///
/// Every float column of `slice` is reduced by every aggregation. An empty
/// slice yields a row of missing values without invoking any aggregation.
///
/// # Errors
/// - Any error from [`output_names`].
/// - `TickbarError::ResultTypeMismatch` if `slice` has no columns or a
///   column is not numeric.
pub fn summarize<S: AsRef<str>>(
    slice: &TimeSeriesTable,
    aggregations: &[Aggregation],
    names: Option<&[S]>,
) -> Result<SummaryRow, TickbarError> {
    let column_names: Vec<&str> = slice.column_names().collect();
    if column_names.is_empty() {
        return Err(TickbarError::result_type_mismatch(
            "no data columns to aggregate",
        ));
    }
    let names = output_names(aggregations, names, &column_names)?;
    let columns = column_names
        .iter()
        .map(|c| slice.float_column(c))
        .collect::<Result<Vec<_>, _>>()?;

    if slice.is_empty() {
        return Ok(SummaryRow {
            values: vec![MISSING; names.len()],
            names,
        });
    }

    let jobs: Vec<(&[f64], &Aggregation)> = columns
        .iter()
        .flat_map(|&col| aggregations.iter().map(move |a| (col, a)))
        .collect();
    let values = evaluate(&jobs);
    Ok(SummaryRow { names, values })
}

#[cfg(not(feature = "parallel"))]
fn evaluate(jobs: &[(&[f64], &Aggregation)]) -> Vec<f64> {
    jobs.iter().map(|(col, agg)| agg.apply(col)).collect()
}

#[cfg(feature = "parallel")]
fn evaluate(jobs: &[(&[f64], &Aggregation)]) -> Vec<f64> {
    use rayon::prelude::*;

    jobs.par_iter().map(|(col, agg)| agg.apply(col)).collect()
}
