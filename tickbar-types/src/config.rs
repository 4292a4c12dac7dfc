//! Configuration types for anchor grids, alignment, and column selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Period, TickbarError};

/// Rule for snapping a grid anchor onto an observed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlignmentPolicy {
    /// Latest observed timestamp at or before the anchor (as-of lookup).
    #[default]
    Before,
    /// Earliest observed timestamp at or after the anchor (backward-fill lookup).
    After,
    /// Both lookups; each anchor may contribute two timestamps.
    BeforeAndAfter,
}

impl AlignmentPolicy {
    /// Whether the as-of lookup participates in this policy.
    #[must_use]
    pub const fn uses_before(self) -> bool {
        matches!(self, Self::Before | Self::BeforeAndAfter)
    }

    /// Whether the backward-fill lookup participates in this policy.
    #[must_use]
    pub const fn uses_after(self) -> bool {
        matches!(self, Self::After | Self::BeforeAndAfter)
    }
}

/// Grid and alignment settings for a resampling pass.
///
/// `period` is the only required option. `length` defaults to one unit of the
/// period and is ignored for [`Period::Continuous`]. `starting` defaults to
/// the earliest observed timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyFilter {
    /// Calendar unit the grid steps by.
    pub period: Period,
    /// Number of period units per step.
    #[serde(default)]
    pub length: Option<u32>,
    /// First anchor of the grid before any calendar roll-forward.
    #[serde(default)]
    pub starting: Option<DateTime<Utc>>,
    /// How anchors are snapped to observed timestamps.
    #[serde(default)]
    pub indexing: AlignmentPolicy,
    /// Also hand back the raw anchor grid next to the resolved timestamps.
    #[serde(default)]
    pub return_fixed_indices: bool,
}

impl FrequencyFilter {
    /// Create a filter stepping one unit of `period` with default options.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            length: None,
            starting: None,
            indexing: AlignmentPolicy::Before,
            return_fixed_indices: false,
        }
    }

    /// Continuous filter: every distinct observation is a boundary.
    #[must_use]
    pub const fn continuous() -> Self {
        Self::new(Period::Continuous)
    }

    /// Set the number of period units per step.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set an explicit first anchor.
    #[must_use]
    pub const fn starting(mut self, starting: DateTime<Utc>) -> Self {
        self.starting = Some(starting);
        self
    }

    /// Select the alignment policy.
    #[must_use]
    pub const fn indexing(mut self, policy: AlignmentPolicy) -> Self {
        self.indexing = policy;
        self
    }

    /// Toggle returning the raw anchor grid alongside the resolved set.
    #[must_use]
    pub const fn return_fixed_indices(mut self, yes: bool) -> Self {
        self.return_fixed_indices = yes;
        self
    }

    /// Step multiplier actually used for grid generation.
    ///
    /// Returns `None` for the continuous period, which never steps.
    #[must_use]
    pub const fn effective_length(&self) -> Option<u32> {
        if self.period.is_continuous() {
            return None;
        }
        match self.length {
            Some(n) => Some(n),
            None => Some(1),
        }
    }

    /// Check that the period/length combination can generate a grid.
    ///
    /// # Errors
    /// Returns `Err(TickbarError::InvalidConfiguration)` if a non-continuous
    /// period is paired with a zero length.
    pub fn validate(&self) -> Result<(), TickbarError> {
        if self.effective_length() == Some(0) {
            return Err(TickbarError::invalid_configuration(format!(
                "length must be positive for period {}",
                self.period
            )));
        }
        Ok(())
    }
}

/// Which data columns an aggregation pass reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelection {
    /// Every data column of the table, in table order.
    #[default]
    All,
    /// Only the named columns, in the given order.
    Only(Vec<String>),
}

impl ColumnSelection {
    /// Select a single column.
    pub fn one(name: impl Into<String>) -> Self {
        Self::Only(vec![name.into()])
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Only(iter.into_iter().map(Into::into).collect())
    }
}
