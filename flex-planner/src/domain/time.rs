//! Service-day time handling.
//!
//! Transit schedules express times as seconds since midnight of the
//! service date they belong to. A trip starting late in the evening runs
//! past "24:00:00" without changing its service date, so these times are
//! deliberately not clamped to a single calendar day. Times before
//! midnight of the service date are negative.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Seconds in a calendar day.
pub const SECONDS_PER_DAY: i32 = 24 * 60 * 60;

/// Error returned when parsing an invalid time or date string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time on a service day, in seconds since midnight of that day.
///
/// Arithmetic saturates at the ends of the `i32` range so that
/// "unbounded" requests (see [`ServiceTime::MIN`] and [`ServiceTime::MAX`])
/// can be pushed through the same code as real times.
///
/// # Examples
///
/// ```
/// use flex_planner::domain::ServiceTime;
///
/// let t = ServiceTime::parse("25:10:00").unwrap();
/// assert_eq!(t.seconds(), 25 * 3600 + 600);
/// assert_eq!(t.to_string(), "25:10:00");
///
/// let earlier = ServiceTime::from_seconds(-90);
/// assert_eq!(earlier.to_string(), "-00:01:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTime(i32);

impl ServiceTime {
    /// Earliest representable time; used for "any time" departure requests.
    pub const MIN: ServiceTime = ServiceTime(i32::MIN);

    /// Latest representable time; used for "any time" arrival requests.
    pub const MAX: ServiceTime = ServiceTime(i32::MAX);

    /// Midnight of the service date.
    pub const MIDNIGHT: ServiceTime = ServiceTime(0);

    /// Create a time from seconds since midnight.
    pub const fn from_seconds(seconds: i32) -> Self {
        Self(seconds)
    }

    /// Create a time from hours, minutes and seconds.
    ///
    /// Hours may exceed 23 for services running past midnight.
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self(hours * 3600 + minutes * 60 + seconds)
    }

    /// Parse `H:MM`, `HH:MM` or `HH:MM:SS`.
    ///
    /// Hours are not limited to 0-23; "26:15:00" is a valid time on a
    /// service day.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');

        let hours = parts
            .next()
            .filter(|h| !h.is_empty() && h.len() <= 3)
            .and_then(|h| h.parse::<i32>().ok())
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;

        let minutes = parts
            .next()
            .and_then(|m| parse_two_digits(m.as_bytes()))
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let seconds = match parts.next() {
            None => 0,
            Some(sec) => {
                let sec = parse_two_digits(sec.as_bytes())
                    .ok_or_else(|| TimeError::new("invalid second digits"))?;
                if sec > 59 {
                    return Err(TimeError::new("second must be 0-59"));
                }
                sec
            }
        };

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM or HH:MM:SS"));
        }
        if hours < 0 {
            return Err(TimeError::new("hour must not be negative"));
        }

        Ok(Self::from_hms(hours, minutes as i32, seconds as i32))
    }

    /// Returns the number of seconds since midnight.
    pub const fn seconds(self) -> i32 {
        self.0
    }

    /// Add seconds, saturating at [`ServiceTime::MIN`]/[`ServiceTime::MAX`].
    pub fn saturating_add_secs(self, seconds: i32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Subtract seconds, saturating at [`ServiceTime::MIN`]/[`ServiceTime::MAX`].
    pub fn saturating_sub_secs(self, seconds: i32) -> Self {
        Self(self.0.saturating_sub(seconds))
    }

    /// Signed number of seconds from `other` to `self`.
    pub fn seconds_since(self, other: ServiceTime) -> i64 {
        i64::from(self.0) - i64::from(other.0)
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = i64::from(self.0).abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{:02}:{:02}:{:02}",
            abs / 3600,
            (abs % 3600) / 60,
            abs % 60
        )
    }
}

/// The calendar date a trip's schedule is evaluated against.
///
/// # Examples
///
/// ```
/// use flex_planner::domain::{ServiceDate, ServiceTime};
///
/// let date = ServiceDate::parse("20240315").unwrap();
/// assert_eq!(date.to_string(), "2024-03-15");
///
/// // 25:00 on the 15th is 01:00 on the 16th
/// let dt = date.time_on(ServiceTime::from_hms(25, 0, 0));
/// assert_eq!(dt.to_string(), "2024-03-16 01:00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceDate(NaiveDate);

impl ServiceDate {
    /// Wrap a calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Create a service date from year, month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse `YYYY-MM-DD` or the GTFS `YYYYMMDD` form.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let format = if s.len() == 8 { "%Y%m%d" } else { "%Y-%m-%d" };
        NaiveDate::parse_from_str(s, format)
            .map(Self)
            .map_err(|_| TimeError::new("expected YYYY-MM-DD or YYYYMMDD"))
    }

    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the following service date.
    pub fn next(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Returns the preceding service date.
    pub fn previous(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Midnight at the start of this service date.
    pub fn midnight(&self) -> NaiveDateTime {
        self.0.and_time(chrono::NaiveTime::MIN)
    }

    /// Wall-clock date-time of a time on this service date.
    pub fn time_on(&self, time: ServiceTime) -> NaiveDateTime {
        self.midnight() + Duration::seconds(i64::from(time.seconds()))
    }

    /// Express a date-time on this service date's time axis.
    ///
    /// Returns `None` if the result does not fit in a [`ServiceTime`].
    pub fn service_time_of(&self, datetime: NaiveDateTime) -> Option<ServiceTime> {
        let seconds = datetime.signed_duration_since(self.midnight()).num_seconds();
        i32::try_from(seconds).ok().map(ServiceTime::from_seconds)
    }

    /// Seconds from `origin` to midnight of this service date.
    ///
    /// A search whose time axis starts at `origin` converts trip-local
    /// times to its own axis by adding this offset.
    pub fn offset_from(&self, origin: NaiveDateTime) -> Option<i32> {
        let seconds = self.midnight().signed_duration_since(origin).num_seconds();
        i32::try_from(seconds).ok()
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for ServiceDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        assert_eq!(ServiceTime::parse("00:00").unwrap().seconds(), 0);
        assert_eq!(ServiceTime::parse("8:05").unwrap().seconds(), 8 * 3600 + 300);
        assert_eq!(
            ServiceTime::parse("23:59:59").unwrap().seconds(),
            SECONDS_PER_DAY - 1
        );
        assert_eq!(ServiceTime::parse("24:00:00").unwrap().seconds(), SECONDS_PER_DAY);
    }

    #[test]
    fn parse_invalid_times() {
        assert!(ServiceTime::parse("").is_err());
        assert!(ServiceTime::parse("1430").is_err());
        assert!(ServiceTime::parse("14:3").is_err());
        assert!(ServiceTime::parse("14:60").is_err());
        assert!(ServiceTime::parse("14:30:61").is_err());
        assert!(ServiceTime::parse("14:30:00:00").is_err());
        assert!(ServiceTime::parse("-1:00").is_err());
        assert!(ServiceTime::parse("ab:cd").is_err());
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(ServiceTime::MAX.saturating_add_secs(10), ServiceTime::MAX);
        assert_eq!(ServiceTime::MIN.saturating_sub_secs(10), ServiceTime::MIN);
        assert_eq!(
            ServiceTime::from_seconds(100).saturating_sub_secs(150),
            ServiceTime::from_seconds(-50)
        );
    }

    #[test]
    fn seconds_since_does_not_overflow() {
        let span = ServiceTime::MAX.seconds_since(ServiceTime::MIN);
        assert_eq!(span, i64::from(i32::MAX) - i64::from(i32::MIN));
    }

    #[test]
    fn display() {
        assert_eq!(ServiceTime::from_hms(9, 5, 7).to_string(), "09:05:07");
        assert_eq!(ServiceTime::from_hms(27, 0, 0).to_string(), "27:00:00");
        assert_eq!(ServiceTime::from_seconds(-3600).to_string(), "-01:00:00");
    }

    #[test]
    fn service_date_parse_formats() {
        let a = ServiceDate::parse("2024-03-15").unwrap();
        let b = ServiceDate::parse("20240315").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.weekday(), Weekday::Fri);
        assert!(ServiceDate::parse("15/03/2024").is_err());
        assert!(ServiceDate::parse("2024-02-30").is_err());
    }

    #[test]
    fn offset_from_search_origin() {
        let date = ServiceDate::from_ymd(2024, 3, 15).unwrap();
        let origin = date.time_on(ServiceTime::from_hms(8, 0, 0));

        // Today's midnight is eight hours before the origin
        assert_eq!(date.offset_from(origin), Some(-8 * 3600));

        // Yesterday's midnight is a further day back
        let yesterday = date.previous().unwrap();
        assert_eq!(yesterday.offset_from(origin), Some(-32 * 3600));
    }

    #[test]
    fn service_time_of_crosses_midnight() {
        let date = ServiceDate::from_ymd(2024, 3, 15).unwrap();
        let next_day_1am = ServiceDate::from_ymd(2024, 3, 16)
            .unwrap()
            .time_on(ServiceTime::from_hms(1, 0, 0));
        assert_eq!(
            date.service_time_of(next_day_1am),
            Some(ServiceTime::from_hms(25, 0, 0))
        );
    }
}
