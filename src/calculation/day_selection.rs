//! Working day selection.
//!
//! This module decides which calendar days in a range need a time entry,
//! based on the day of the week and a supplied set of public holidays.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The kind of calendar day, as far as weekend skipping is concerned.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::{DayType, get_day_type};
/// use chrono::NaiveDate;
///
/// // 2025-01-04 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
/// assert_eq!(get_day_type(saturday), DayType::Saturday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayType {
    /// True for Saturday and Sunday.
    pub fn is_weekend(self) -> bool {
        matches!(self, DayType::Saturday | DayType::Sunday)
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
        }
    }
}

/// Determines the day type for a given date.
pub fn get_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}

/// Returns the working days between `start` and `end`, inclusive and ascending.
///
/// A date is kept when it is not excluded by either rule: weekends are
/// excluded when `skip_weekends` is set, and dates in `holidays` are
/// excluded when `skip_holidays` is set. The function is pure; a range with
/// `end < start` or with no qualifying day yields an empty vector.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use worklog_engine::calculation::working_days;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
/// let holidays = HashSet::from([d(1), d(6)]);
///
/// let days = working_days(d(1), d(7), true, true, &holidays);
/// assert_eq!(days, vec![d(2), d(3), d(7)]);
/// ```
pub fn working_days(
    start: NaiveDate,
    end: NaiveDate,
    skip_weekends: bool,
    skip_holidays: bool,
    holidays: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !skip_weekends || !get_day_type(*day).is_weekend())
        .filter(|day| !skip_holidays || !holidays.contains(day))
        .collect()
}
