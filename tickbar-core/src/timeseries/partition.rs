//! Pair consecutive resolved boundaries into inclusive intervals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Span between two consecutive resolved boundaries.
///
/// Both ends are inclusive: an observation sitting exactly on a boundary
/// belongs to the interval ending there and to the one starting there, so
/// adjacent bars share their fence post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// First boundary (inclusive).
    pub start: DateTime<Utc>,
    /// Second boundary (inclusive).
    pub end: DateTime<Utc>,
}

impl Interval {
    /// True if `ts` lies within `[start, end]`.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Pair each resolved boundary with its successor.
///
/// `n` boundaries give `n - 1` intervals; zero or one boundary gives none.
#[must_use]
pub fn partition(resolved: &[DateTime<Utc>]) -> Vec<Interval> {
    resolved
        .windows(2)
        .map(|w| Interval {
            start: w[0],
            end: w[1],
        })
        .collect()
}
