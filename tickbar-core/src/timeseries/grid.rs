//! Regular anchor grids over an observed time range.
//!
//! Fixed-duration periods step from `starting` verbatim. Anchored periods
//! (business day, week, month/semi-month/quarter ends, business hour) first
//! roll `starting` forward to the next on-offset instant, keeping its time of
//! day, and then step from there.

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc, Weekday,
};
use tickbar_types::{FrequencyFilter, Period, TickbarError};

use super::util::unique_axis;

const SESSION_OPEN_HOUR: u32 = 9;
const SESSION_CLOSE_HOUR: u32 = 17;

/// Generate the anchor grid for `axis` under `filter`.
///
/// Anchors run from `filter.starting` (default: the earliest timestamp of
/// `axis`) up to and including the latest timestamp of `axis`, stepping by
/// `filter.effective_length()` units of `filter.period`. For
/// [`Period::Continuous`] the grid is the deduplicated, sorted axis itself.
/// An empty axis yields an empty grid.
///
/// # Errors
/// Returns `Err(TickbarError::InvalidConfiguration)` if the length is zero.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tickbar_core::grid::anchor_grid",
        level = "trace",
        skip(axis),
        fields(period = %filter.period, length = ?filter.length, points = axis.len()),
    )
)]
pub fn anchor_grid(
    axis: &[DateTime<Utc>],
    filter: &FrequencyFilter,
) -> Result<Vec<DateTime<Utc>>, TickbarError> {
    filter.validate()?;
    let Some(step) = filter.effective_length() else {
        return Ok(unique_axis(axis));
    };
    let (Some(&min), Some(&max)) = (axis.iter().min(), axis.iter().max()) else {
        return Ok(Vec::new());
    };
    let start = filter.starting.unwrap_or(min);

    let mut grid = Vec::new();
    let Some(mut cur) = roll_forward(filter.period, start) else {
        return Ok(grid);
    };
    while cur <= max {
        grid.push(cur);
        match advance(filter.period, cur, step) {
            Some(next) if next > cur => cur = next,
            _ => break,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(anchors = grid.len(), first = ?grid.first(), "generated anchor grid");

    Ok(grid)
}

/// Move `ts` forward to the first instant that lies on `period`'s calendar.
///
/// Fixed-duration periods are on-offset everywhere. Returns `None` only when
/// the roll would leave chrono's representable range.
#[must_use]
pub fn roll_forward(period: Period, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let naive = ts.naive_utc();
    let (date, time) = (naive.date(), naive.time());
    let rolled = match period {
        Period::Day
        | Period::Hour
        | Period::Minute
        | Period::Second
        | Period::Millisecond
        | Period::Microsecond
        | Period::Continuous => naive,
        Period::BusinessDay => next_business_day_inclusive(date)?.and_time(time),
        Period::Week => {
            let ahead = (7 - date.weekday().num_days_from_sunday()) % 7;
            date.checked_add_signed(TimeDelta::days(i64::from(ahead)))?
                .and_time(time)
        }
        Period::MonthEnd => month_end(date.year(), date.month())?.and_time(time),
        Period::BusinessMonthEnd => {
            let this_month = business_month_end(date.year(), date.month())?;
            if date <= this_month {
                this_month.and_time(time)
            } else {
                let next = first_of_month(date)?.checked_add_months(Months::new(1))?;
                business_month_end(next.year(), next.month())?.and_time(time)
            }
        }
        Period::SemiMonthEnd => {
            if date.day() <= 15 {
                date.with_day(15)?.and_time(time)
            } else {
                month_end(date.year(), date.month())?.and_time(time)
            }
        }
        Period::Quarter => {
            let quarter_month = date.month().div_ceil(3) * 3;
            month_end(date.year(), quarter_month)?.and_time(time)
        }
        Period::BusinessHour => roll_into_session(naive)?,
    };
    Some(rolled.and_utc())
}

/// Step an on-offset instant forward by `n` units of `period`.
///
/// Returns `None` if the result is not representable.
#[must_use]
pub fn advance(period: Period, ts: DateTime<Utc>, n: u32) -> Option<DateTime<Utc>> {
    let n64 = i64::from(n);
    let naive = ts.naive_utc();
    let (date, time) = (naive.date(), naive.time());
    let next = match period {
        Period::Day => naive.checked_add_signed(TimeDelta::try_days(n64)?)?,
        Period::Hour => naive.checked_add_signed(TimeDelta::try_hours(n64)?)?,
        Period::Minute => naive.checked_add_signed(TimeDelta::try_minutes(n64)?)?,
        Period::Second => naive.checked_add_signed(TimeDelta::try_seconds(n64)?)?,
        Period::Millisecond => naive.checked_add_signed(TimeDelta::try_milliseconds(n64)?)?,
        Period::Microsecond => naive.checked_add_signed(TimeDelta::microseconds(n64))?,
        Period::Week => naive.checked_add_signed(TimeDelta::try_weeks(n64)?)?,
        Period::BusinessDay => {
            let mut d = date;
            for _ in 0..n {
                d = next_business_day_inclusive(d.succ_opt()?)?;
            }
            d.and_time(time)
        }
        Period::MonthEnd => {
            let target = first_of_month(date)?.checked_add_months(Months::new(n))?;
            month_end(target.year(), target.month())?.and_time(time)
        }
        Period::BusinessMonthEnd => {
            let target = first_of_month(date)?.checked_add_months(Months::new(n))?;
            business_month_end(target.year(), target.month())?.and_time(time)
        }
        Period::SemiMonthEnd => {
            let mut d = date;
            for _ in 0..n {
                d = if d.day() == 15 {
                    month_end(d.year(), d.month())?
                } else {
                    first_of_month(d)?
                        .checked_add_months(Months::new(1))?
                        .with_day(15)?
                };
            }
            d.and_time(time)
        }
        Period::Quarter => {
            let target = first_of_month(date)?.checked_add_months(Months::new(n.checked_mul(3)?))?;
            month_end(target.year(), target.month())?.and_time(time)
        }
        Period::BusinessHour => {
            let mut cur = naive;
            for _ in 0..n {
                cur = add_business_hour(cur)?;
            }
            cur
        }
        Period::Continuous => return None,
    };
    Some(next.and_utc())
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn next_business_day_inclusive(mut date: NaiveDate) -> Option<NaiveDate> {
    while !is_business_day(date) {
        date = date.succ_opt()?;
    }
    Some(date)
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn business_month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let mut d = month_end(year, month)?;
    while !is_business_day(d) {
        d = d.pred_opt()?;
    }
    Some(d)
}

fn session_open() -> NaiveTime {
    NaiveTime::MIN + TimeDelta::hours(i64::from(SESSION_OPEN_HOUR))
}

fn session_close() -> NaiveTime {
    NaiveTime::MIN + TimeDelta::hours(i64::from(SESSION_CLOSE_HOUR))
}

fn roll_into_session(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    let (date, time) = (ts.date(), ts.time());
    if !is_business_day(date) {
        return Some(next_business_day_inclusive(date)?.and_time(session_open()));
    }
    if time > session_close() {
        let next = next_business_day_inclusive(date.succ_opt()?)?;
        return Some(next.and_time(session_open()));
    }
    if time < session_open() {
        return Some(date.and_time(session_open()));
    }
    Some(ts)
}

fn add_business_hour(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    let hour = TimeDelta::hours(1);
    let until_close = ts.date().and_time(session_close()) - ts;
    if until_close >= hour {
        return ts.checked_add_signed(hour);
    }
    let overflow = hour - until_close;
    let next = next_business_day_inclusive(ts.date().succ_opt()?)?;
    next.and_time(session_open()).checked_add_signed(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
            .and_utc()
    }

    fn grid(period: Period, length: u32, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        anchor_grid(&[from, to], &FrequencyFilter::new(period).length(length)).unwrap()
    }

    #[test]
    fn minute_grid_includes_end() {
        let g = grid(Period::Minute, 2, at(2020, 3, 13, 8, 0), at(2020, 3, 13, 8, 9));
        assert_eq!(g.len(), 5);
        assert_eq!(g[4], at(2020, 3, 13, 8, 8));
        let g = grid(Period::Minute, 3, at(2020, 3, 13, 8, 0), at(2020, 3, 13, 8, 9));
        assert_eq!(g.last(), Some(&at(2020, 3, 13, 8, 9)));
    }

    #[test]
    fn business_day_skips_weekend() {
        // 2020-03-13 is a Friday
        let g = grid(Period::BusinessDay, 1, at(2020, 3, 13, 10, 0), at(2020, 3, 18, 10, 0));
        assert_eq!(
            g,
            vec![
                at(2020, 3, 13, 10, 0),
                at(2020, 3, 16, 10, 0),
                at(2020, 3, 17, 10, 0),
                at(2020, 3, 18, 10, 0),
            ]
        );
        // Saturday start rolls to Monday
        assert_eq!(
            roll_forward(Period::BusinessDay, at(2020, 3, 14, 0, 0)),
            Some(at(2020, 3, 16, 0, 0))
        );
    }

    #[test]
    fn week_anchors_on_sunday() {
        let g = grid(Period::Week, 1, at(2020, 3, 13, 0, 0), at(2020, 3, 31, 0, 0));
        assert_eq!(g, vec![at(2020, 3, 15, 0, 0), at(2020, 3, 22, 0, 0), at(2020, 3, 29, 0, 0)]);
    }

    #[test]
    fn month_ends_and_business_month_ends() {
        let g = grid(Period::MonthEnd, 1, at(2020, 1, 15, 0, 0), at(2020, 4, 30, 0, 0));
        assert_eq!(
            g,
            vec![at(2020, 1, 31, 0, 0), at(2020, 2, 29, 0, 0), at(2020, 3, 31, 0, 0), at(2020, 4, 30, 0, 0)]
        );
        // 2020-05-31 is a Sunday, so the business month end is Friday the 29th
        assert_eq!(business_month_end(2020, 5), NaiveDate::from_ymd_opt(2020, 5, 29));
        assert_eq!(
            roll_forward(Period::BusinessMonthEnd, at(2020, 5, 30, 0, 0)),
            Some(at(2020, 6, 30, 0, 0))
        );
    }

    #[test]
    fn semi_month_and_quarter() {
        let g = grid(Period::SemiMonthEnd, 1, at(2020, 1, 10, 0, 0), at(2020, 2, 20, 0, 0));
        assert_eq!(
            g,
            vec![at(2020, 1, 15, 0, 0), at(2020, 1, 31, 0, 0), at(2020, 2, 15, 0, 0)]
        );
        let q = grid(Period::Quarter, 1, at(2020, 2, 1, 0, 0), at(2020, 12, 31, 0, 0));
        assert_eq!(
            q,
            vec![at(2020, 3, 31, 0, 0), at(2020, 6, 30, 0, 0), at(2020, 9, 30, 0, 0), at(2020, 12, 31, 0, 0)]
        );
    }

    #[test]
    fn business_hour_wraps_overnight_and_weekend() {
        assert_eq!(
            advance(Period::BusinessHour, at(2020, 3, 12, 16, 0), 1),
            Some(at(2020, 3, 12, 17, 0))
        );
        assert_eq!(
            advance(Period::BusinessHour, at(2020, 3, 12, 17, 0), 1),
            Some(at(2020, 3, 13, 10, 0))
        );
        assert_eq!(
            advance(Period::BusinessHour, at(2020, 3, 13, 16, 30), 1),
            Some(at(2020, 3, 16, 9, 30))
        );
        assert_eq!(
            roll_forward(Period::BusinessHour, at(2020, 3, 13, 18, 0)),
            Some(at(2020, 3, 16, 9, 0))
        );
        assert_eq!(
            roll_forward(Period::BusinessHour, at(2020, 3, 14, 8, 0)),
            Some(at(2020, 3, 16, 9, 0))
        );
        assert_eq!(
            roll_forward(Period::BusinessHour, at(2020, 3, 16, 7, 0)),
            Some(at(2020, 3, 16, 9, 0))
        );
    }

    #[test]
    fn starting_after_data_gives_empty_grid() {
        let f = FrequencyFilter::new(Period::Hour).starting(at(2021, 1, 1, 0, 0));
        assert!(anchor_grid(&[at(2020, 1, 1, 0, 0)], &f).unwrap().is_empty());
        assert!(anchor_grid(&[], &FrequencyFilter::new(Period::Hour)).unwrap().is_empty());
    }
}
