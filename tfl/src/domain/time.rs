//! Wall-clock time handling.
//!
//! Users ask for departures "at 14:30", and timetables list journeys as
//! bare hour/minute pairs. Both are anchored to today's local date here.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Error returned when parsing an invalid time string.
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

/// Parse a time of day in "HH:MM" or "H:MM" format.
///
/// # Examples
///
/// ```
/// use tfl::domain::parse_hhmm;
///
/// assert!(parse_hhmm("14:30").is_ok());
/// assert!(parse_hhmm("2:30").is_ok());
///
/// assert!(parse_hhmm("1430").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// assert!(parse_hhmm("14:60").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| TimeError::new("use HH:MM (e.g. 14:30)"))?;

    if hour.is_empty() || hour.len() > 2 {
        return Err(TimeError::new("hour must be one or two digits"));
    }
    if minute.len() != 2 {
        return Err(TimeError::new("minute must be two digits"));
    }

    let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute = parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse "HH:MM" as a time on the same local date as `now`.
pub fn parse_time_today(s: &str, now: DateTime<Local>) -> Result<DateTime<Local>, TimeError> {
    let time = parse_hhmm(s)?;
    local_at(now.date_naive(), time.hour(), time.minute())
        .ok_or_else(|| TimeError::new("time does not exist on today's date"))
}

/// The local instant `hour:minute` after midnight on `date`.
///
/// Hours of 24 and above roll into the following day, which is how
/// timetables list services running after midnight. Returns `None` when the
/// result is out of range or the wall-clock time is skipped by a
/// daylight-saving change; an ambiguous time resolves to its earlier instant.
pub fn local_at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let wall_clock = midnight
        .checked_add_signed(Duration::hours(i64::from(hour)))?
        .checked_add_signed(Duration::minutes(i64::from(minute)))?;
    Local.from_local_datetime(&wall_clock).earliest()
}

/// Parse an ASCII digit string into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    s.chars().try_fold(0u32, |acc, c| Some(acc * 10 + c.to_digit(10)?))
}
