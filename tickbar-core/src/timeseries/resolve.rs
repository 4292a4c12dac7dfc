//! Snap anchors onto timestamps that were actually observed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tickbar_types::{AlignmentPolicy, FrequencyFilter, TickbarError};

use super::grid::anchor_grid;
use super::util::unique_axis;

/// Resolved boundary timestamps, optionally with the grid that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedIndices {
    /// Distinct observed timestamps in ascending order.
    pub resolved: Vec<DateTime<Utc>>,
    /// The raw anchor grid; present only when `return_fixed_indices` was set.
    pub fixed: Option<Vec<DateTime<Utc>>>,
}

/// Latest timestamp in `axis` at or before `target`.
///
/// `axis` must be sorted ascending.
#[must_use]
pub fn as_of(axis: &[DateTime<Utc>], target: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let i = axis.partition_point(|t| *t <= target);
    i.checked_sub(1).map(|i| axis[i])
}

/// Earliest timestamp in `axis` at or after `target`.
///
/// `axis` must be sorted ascending.
#[must_use]
pub fn backfill(axis: &[DateTime<Utc>], target: DateTime<Utc>) -> Option<DateTime<Utc>> {
    axis.get(axis.partition_point(|t| *t < target)).copied()
}

/// Map every anchor onto `axis` under `policy`.
///
/// Anchors with no qualifying timestamp contribute nothing. The result is
/// sorted ascending and duplicate-free. `axis` must be sorted ascending.
#[must_use]
pub fn resolve_anchors(
    axis: &[DateTime<Utc>],
    anchors: &[DateTime<Utc>],
    policy: AlignmentPolicy,
) -> Vec<DateTime<Utc>> {
    let mut out = Vec::with_capacity(anchors.len());
    for &anchor in anchors {
        if policy.uses_before() {
            out.extend(as_of(axis, anchor));
        }
        if policy.uses_after() {
            out.extend(backfill(axis, anchor));
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

/// Build the anchor grid for `index` and resolve it against the observed
/// timestamps.
///
/// `index` may be unsorted and may contain duplicates.
///
/// # Errors
/// Returns `Err(TickbarError::InvalidConfiguration)` if `filter` cannot
/// generate a grid.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tickbar_core::resolve::resolve_indices",
        level = "debug",
        skip(index),
        fields(rows = index.len()),
    )
)]
pub fn resolve_indices(
    index: &[DateTime<Utc>],
    filter: &FrequencyFilter,
) -> Result<ResolvedIndices, TickbarError> {
    let axis = unique_axis(index);
    let grid = anchor_grid(&axis, filter)?;
    let resolved = resolve_anchors(&axis, &grid, filter.indexing);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        distinct = axis.len(),
        anchors = grid.len(),
        resolved = resolved.len(),
        "resolved anchor grid"
    );

    Ok(ResolvedIndices {
        resolved,
        fixed: filter.return_fixed_indices.then_some(grid),
    })
}
