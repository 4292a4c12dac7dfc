// Shared fixtures so tests can `use helpers::*;`
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tickbar::TimeSeriesTable;

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("invalid date")
        .and_hms_opt(hh, mm, ss)
        .expect("invalid time components")
        .and_utc()
}

pub fn hm(hh: u32, mm: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hh, mm, 0).expect("invalid time of day")
}

/// Friday 2020-03-13 at `hh:mm`.
pub fn fri(hh: u32, mm: u32) -> DateTime<Utc> {
    dt(2020, 3, 13, hh, mm, 0)
}

/// Irregular intraday ticks over two days with a `Return` column.
///
/// Two ticks share 09:30 on Friday, one tick falls outside trading hours
/// each evening, and returns alternate sign.
pub fn two_day_ticks() -> TimeSeriesTable {
    let index = vec![
        fri(9, 30),
        fri(9, 30),
        fri(9, 31),
        fri(9, 33),
        fri(9, 36),
        fri(20, 0),
        dt(2020, 3, 16, 9, 30, 0),
        dt(2020, 3, 16, 9, 32, 0),
        dt(2020, 3, 16, 23, 15, 0),
    ];
    let ret = vec![0.01, -0.02, 0.03, -0.01, 0.02, 0.05, -0.03, 0.04, 0.01];
    TimeSeriesTable::from_float_columns(index, [("Return", ret)]).expect("fixture table")
}
