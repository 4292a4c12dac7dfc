//! Shared helpers for timestamp axes and value columns.

use chrono::{DateTime, Utc};

use crate::table::MISSING;

/// Collapse an index into distinct timestamps in ascending order.
///
/// Duplicate observation instants are legal in a table but every boundary
/// lookup works against this deduplicated axis.
#[must_use]
pub fn unique_axis(index: &[DateTime<Utc>]) -> Vec<DateTime<Utc>> {
    let mut axis = index.to_vec();
    if !axis.is_sorted() {
        axis.sort_unstable();
    }
    axis.dedup();
    axis
}

/// True if `axis` is strictly ascending (sorted and duplicate-free).
#[must_use]
pub fn is_strictly_ascending(axis: &[DateTime<Utc>]) -> bool {
    axis.windows(2).all(|w| w[0] < w[1])
}

/// Shift values by `periods` positions, filling vacated slots with [`MISSING`].
///
/// A positive shift moves values towards later rows (lag); a negative shift
/// moves them towards earlier rows (lead). Shifting by at least the length
/// yields an all-missing column.
#[must_use]
pub fn shift_values(values: &[f64], periods: i64) -> Vec<f64> {
    let len = values.len();
    let n = usize::try_from(periods.unsigned_abs()).unwrap_or(usize::MAX).min(len);
    let mut out = vec![MISSING; len];
    if periods >= 0 {
        out[n..].copy_from_slice(&values[..len - n]);
    } else {
        out[..len - n].copy_from_slice(&values[n..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_lag_and_lead() {
        let v = [1.0, 2.0, 3.0];
        let lag = shift_values(&v, 1);
        assert!(lag[0].is_nan());
        assert_eq!(&lag[1..], &[1.0, 2.0]);

        let lead = shift_values(&v, -2);
        assert_eq!(lead[0], 3.0);
        assert!(lead[1].is_nan() && lead[2].is_nan());

        assert_eq!(shift_values(&v, 0), v.to_vec());
        assert!(shift_values(&v, 10).iter().all(|x| x.is_nan()));
        assert!(shift_values(&[], -3).is_empty());
    }

    #[test]
    fn unique_axis_sorts_and_dedups() {
        let t = |s| DateTime::from_timestamp(s, 0).unwrap();
        let axis = unique_axis(&[t(3), t(1), t(3), t(2), t(1)]);
        assert_eq!(axis, vec![t(1), t(2), t(3)]);
        assert!(is_strictly_ascending(&axis));
    }
}
