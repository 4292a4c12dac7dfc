use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tickbar workspace.
///
/// Configuration problems (bad period, bad length, mismatched function/name
/// lists) are separated from shape problems in the data itself, so callers can
/// tell a mistake in how the pipeline was set up from a table that cannot be
/// summarised.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TickbarError {
    /// Unrecognized period code, or a period/length combination that cannot
    /// generate an anchor grid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The number of aggregation functions does not match the number of
    /// output names supplied for them, or no functions were supplied at all
    /// (`functions == 0`).
    #[error("configuration mismatch: {functions} functions but {names} names")]
    ConfigurationMismatch {
        /// Number of aggregation functions supplied.
        functions: usize,
        /// Number of output names supplied.
        names: usize,
    },

    /// A step produced a value that cannot be assembled into the expected
    /// row/column shape.
    #[error("result type mismatch: {0}")]
    ResultTypeMismatch(String),

    /// A requested column is not present in the table.
    #[error("unknown column: {column}")]
    UnknownColumn {
        /// Name of the missing column.
        column: String,
    },

    /// Two output columns would share the same name.
    #[error("duplicate column: {column}")]
    DuplicateColumn {
        /// Name that appears more than once.
        column: String,
    },

    /// Malformed input table (column length differs from the index, etc.).
    #[error("data issue: {0}")]
    Data(String),
}

impl TickbarError {
    /// Helper: build an `InvalidConfiguration` error from a message.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Helper: build a `ResultTypeMismatch` error from a message.
    pub fn result_type_mismatch(msg: impl Into<String>) -> Self {
        Self::ResultTypeMismatch(msg.into())
    }

    /// Helper: build an `UnknownColumn` error for the given column name.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Helper: build a `DuplicateColumn` error for the given column name.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Returns true if the error stems from how the pipeline was configured
    /// rather than from the data it was given.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::ConfigurationMismatch { .. }
                | Self::UnknownColumn { .. }
                | Self::DuplicateColumn { .. }
        )
    }
}
