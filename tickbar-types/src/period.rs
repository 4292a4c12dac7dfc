use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::TickbarError;

/// Calendar unit that an anchor grid steps by.
///
/// This is a closed enumeration: adding a period is a schema change, and the
/// short codes returned by [`Period::code`] are stable across releases since
/// they are what configuration files carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    /// Calendar day (24 hours).
    Day,
    /// Monday through Friday.
    BusinessDay,
    /// Week ending on Sunday.
    Week,
    /// Last calendar day of the month.
    MonthEnd,
    /// Last weekday of the month.
    BusinessMonthEnd,
    /// The 15th and the last day of the month.
    SemiMonthEnd,
    /// Last day of March, June, September and December.
    Quarter,
    /// One hour.
    Hour,
    /// One hour of the 09:00 to 17:00 weekday session.
    BusinessHour,
    /// One minute.
    Minute,
    /// One second.
    Second,
    /// One millisecond.
    Millisecond,
    /// One microsecond.
    Microsecond,
    /// No periodicity: every distinct observed timestamp is a boundary.
    Continuous,
}

impl Period {
    /// Every member, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Day,
        Self::BusinessDay,
        Self::Week,
        Self::MonthEnd,
        Self::BusinessMonthEnd,
        Self::SemiMonthEnd,
        Self::Quarter,
        Self::Hour,
        Self::BusinessHour,
        Self::Minute,
        Self::Second,
        Self::Millisecond,
        Self::Microsecond,
        Self::Continuous,
    ];

    /// Stable short code used in configuration and logs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Day => "D",
            Self::BusinessDay => "B",
            Self::Week => "W",
            Self::MonthEnd => "M",
            Self::BusinessMonthEnd => "BM",
            Self::SemiMonthEnd => "SM",
            Self::Quarter => "Q",
            Self::Hour => "H",
            Self::BusinessHour => "BH",
            Self::Minute => "T",
            Self::Second => "S",
            Self::Millisecond => "L",
            Self::Microsecond => "U",
            Self::Continuous => "",
        }
    }

    /// True for the "no periodicity" member.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Continuous)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_continuous() {
            f.write_str("continuous")
        } else {
            f.write_str(self.code())
        }
    }
}

impl FromStr for Period {
    type Err = TickbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("continuous") {
            return Ok(Self::Continuous);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| TickbarError::invalid_configuration(format!("unrecognized period '{s}'")))
    }
}

impl TryFrom<String> for Period {
    type Error = TickbarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.code().to_string()
    }
}
