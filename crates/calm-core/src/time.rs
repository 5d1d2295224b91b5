//! Shared date arithmetic and analysis periods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Size of the analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

/// Minutes from `start` to `end`, fractional, negative when `end < start`.
#[expect(
    clippy::cast_precision_loss,
    reason = "millisecond spans of calendar data fit comfortably in f64"
)]
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MS_PER_MINUTE
}

/// Calendar day an instant belongs to, used for per-day grouping.
pub fn day_key(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    midnight_to_utc(&Local, local_date)
}

/// Start of `date` in `tz`, as UTC.
///
/// When a spring-forward gap swallows midnight, the first whole hour that
/// exists is used instead.
fn midnight_to_utc<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    (0..=3)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| tz.from_local_datetime(&date.and_time(time)).earliest())
        .map_or_else(
            || Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            |dt| dt.with_timezone(&Utc),
        )
}

/// First calendar date of the period containing `date`.
pub fn first_day_of_period(granularity: Granularity, date: NaiveDate) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
        Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// First local date of the period following the one starting at `start`.
fn next_period_start(granularity: Granularity, start: NaiveDate) -> NaiveDate {
    match granularity {
        Granularity::Day => start + Duration::days(1),
        Granularity::Week => start + Duration::days(7),
        Granularity::Month => start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(start + Duration::days(31)),
        Granularity::Year => start
            .checked_add_months(chrono::Months::new(12))
            .unwrap_or(start + Duration::days(365)),
    }
}

/// Inclusive `[start, end]` window of the local period containing `date`.
///
/// Weeks start on Monday. The end is the last millisecond before the next
/// period, matching the engine's inclusive start-time filter.
pub fn period_bounds(granularity: Granularity, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = first_day_of_period(granularity, date);
    let next = next_period_start(granularity, start);
    (
        local_midnight_to_utc(start),
        local_midnight_to_utc(next) - Duration::milliseconds(1),
    )
}

/// Last calendar date of the period containing `date`.
pub fn last_day_of_period(granularity: Granularity, date: NaiveDate) -> NaiveDate {
    let start = first_day_of_period(granularity, date);
    next_period_start(granularity, start) - Duration::days(1)
}

/// Every calendar date from `first` to `last`, inclusive.
pub fn days_in_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|day| *day <= last).collect()
}
