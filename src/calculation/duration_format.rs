//! Duration and timestamp formatting for submission.
//!
//! The tracker accepts worklog durations as `"2h 30m"` strings in its web
//! form and start times in two different layouts depending on the back end.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

use crate::error::{EngineError, EngineResult};

/// Time of day used for worklog start times unless configured otherwise.
pub const DEFAULT_START_TIME: &str = "16:00";

/// Layout of the REST `started` field, e.g. `2025-08-19T16:00:00.000+0200`.
const REST_STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Layout of the web form `startDate` field, e.g. `19/Aug/25 04:00 PM`.
const FORM_DATE_FORMAT: &str = "%d/%b/%y %I:%M %p";

/// Formats minutes as a tracker duration string.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::format_duration;
///
/// assert_eq!(format_duration(150), "2h 30m");
/// assert_eq!(format_duration(120), "2h");
/// assert_eq!(format_duration(45), "45m");
/// assert_eq!(format_duration(0), "0m");
/// ```
pub fn format_duration(minutes: u64) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, rest) => format!("{rest}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, rest) => format!("{hours}h {rest}m"),
    }
}

/// Parses an `HH:MM` time of day.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimeOfDay`] when the value is not a valid
/// 24-hour time.
pub fn parse_time_of_day(value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| EngineError::InvalidTimeOfDay {
        value: value.to_string(),
    })
}

/// Builds the REST `started` value for `date` at `time` in the local zone.
///
/// # Errors
///
/// Returns [`EngineError::Timestamp`] when the local time does not exist on
/// that day (a daylight saving gap).
pub fn rest_started_timestamp(date: NaiveDate, time: NaiveTime) -> EngineResult<String> {
    started_timestamp_in(&Local, date, time)
}

/// Same as [`rest_started_timestamp`] for an explicit time zone.
///
/// When the local time is ambiguous the earlier instant is used.
///
/// # Example
///
/// ```
/// use chrono::{FixedOffset, NaiveDate, NaiveTime};
/// use worklog_engine::calculation::started_timestamp_in;
///
/// let zone = FixedOffset::east_opt(2 * 3600).unwrap();
/// let started = started_timestamp_in(
///     &zone,
///     NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
///     NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(started, "2025-08-19T16:00:00.000+0200");
/// ```
pub fn started_timestamp_in<Tz>(zone: &Tz, date: NaiveDate, time: NaiveTime) -> EngineResult<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    zone.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|started| started.format(REST_STARTED_FORMAT).to_string())
        .ok_or_else(|| EngineError::Timestamp {
            date,
            message: format!("local time {} does not exist", time.format("%H:%M")),
        })
}

/// Builds the web form `startDate` value, e.g. `19/Aug/25 04:00 PM`.
pub fn form_date(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time).format(FORM_DATE_FORMAT).to_string()
}
