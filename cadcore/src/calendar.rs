//! Calendar-aligned period comparisons.
//!
//! Every comparison converts the unix timestamps into the local dates of
//! the configured [`Calendar`] first, so a "day" runs from local midnight
//! to local midnight, a "week" starts on the configured [`WeekStart`],
//! and months and years follow the civil calendar.  Nothing here uses
//! fixed length windows.

use chrono::{
    DateTime,
    Datelike,
    Duration,
    FixedOffset,
    NaiveDate,
    NaiveTime,
    Offset,
    Utc,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
};

use crate::error::ValueError;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Calendar {
    offset: FixedOffset,
    week_start: WeekStart,
}

/// Parse offsets in the form of `+HH:MM`, `-HH:MM` or `Z`.
pub fn parse_offset(s: &str) -> Result<FixedOffset, ValueError> {
    match s.trim() {
        "Z" | "z" => Ok(Utc.fix()),
        offset => offset
            .parse::<FixedOffset>()
            .map_err(|_| ValueError::InvalidOffset(s.to_string())),
    }
}

impl WeekStart {
    fn days_into_week(&self, date: NaiveDate) -> i64 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday() as i64,
            WeekStart::Monday => date.weekday().num_days_from_monday() as i64,
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => "sunday".fmt(f),
            WeekStart::Monday => "monday".fmt(f),
        }
    }
}

impl FromStr for WeekStart {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(ValueError::Unsupported(format!("{s:?} is not a week start"))),
        }
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(offset: FixedOffset, week_start: WeekStart) -> Self {
        Self { offset, week_start }
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
            week_start: WeekStart::default(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn local(&self, ts: i64) -> DateTime<FixedOffset> {
        DateTime::<Utc>::from_timestamp(ts, 0)
            .unwrap_or_default()
            .with_timezone(&self.offset)
    }

    /// The local calendar date of the timestamp.
    pub fn date(&self, ts: i64) -> NaiveDate {
        self.local(ts).date_naive()
    }

    /// The timestamp of local midnight at the start of `date`.
    pub fn start_of(&self, date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
            - i64::from(self.offset.local_minus_utc())
    }

    /// The first day of the week that contains `date`.
    pub fn week_of(&self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(self.week_start.days_into_week(date))
    }

    pub fn same_period(&self, a: i64, b: i64, period: Period) -> bool {
        let (a, b) = (self.date(a), self.date(b));
        match period {
            Period::Day => a == b,
            Period::Week => self.week_of(a) == self.week_of(b),
            Period::Month => a.year() == b.year() && a.month() == b.month(),
            Period::Year => a.year() == b.year(),
        }
    }
}
