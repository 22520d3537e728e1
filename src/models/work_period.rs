//! Work period and public holiday models.
//!
//! This module contains the [`WorkPeriod`] and [`PublicHoliday`] types that
//! define which calendar range a run covers and which days in it are
//! non-working.

use std::collections::HashSet;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a public holiday.
///
/// Holidays are tracked per region so that configuration files for several
/// jurisdictions can coexist.
///
/// # Example
///
/// ```
/// use worklog_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
///     name: "Epiphany".to_string(),
///     region: "SK".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    pub name: String,
    /// The region where this holiday applies (e.g. "SK").
    #[serde(default)]
    pub region: String,
}

/// An inclusive date range together with the holidays that fall in it.
///
/// # Example
///
/// ```
/// use worklog_engine::models::{PublicHoliday, WorkPeriod};
/// use chrono::NaiveDate;
///
/// let period = WorkPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
///     public_holidays: vec![PublicHoliday {
///         date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
///         name: "Epiphany".to_string(),
///         region: "SK".to_string(),
///     }],
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()));
/// assert!(period.is_public_holiday(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPeriod {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Public holidays known for the period.
    #[serde(default)]
    pub public_holidays: Vec<PublicHoliday>,
}

impl WorkPeriod {
    /// Creates a period without holidays.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            public_holidays: Vec::new(),
        }
    }

    /// Attaches the holidays that fall inside the period, dropping the rest.
    pub fn with_holidays<'a, I>(mut self, holidays: I) -> Self
    where
        I: IntoIterator<Item = &'a PublicHoliday>,
    {
        let (start, end) = (self.start_date, self.end_date);
        self.public_holidays = holidays
            .into_iter()
            .filter(|h| h.date >= start && h.date <= end)
            .cloned()
            .collect();
        self
    }

    /// A period covering only `today`.
    pub fn today(today: NaiveDate) -> Self {
        Self::new(today, today)
    }

    /// Monday to Friday of the week containing `today`.
    pub fn this_week(today: NaiveDate) -> Self {
        let monday = start_of_week(today);
        Self::new(monday, monday + Duration::days(4))
    }

    /// Monday to Friday of the week before the one containing `today`.
    pub fn last_week(today: NaiveDate) -> Self {
        let monday = start_of_week(today) - Duration::days(7);
        Self::new(monday, monday + Duration::days(4))
    }

    /// First to last calendar day of the month containing `today`.
    pub fn this_month(today: NaiveDate) -> Self {
        Self::new(first_day_of_month(today), last_day_of_month(today))
    }

    /// Checks that the period does not end before it starts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if a given date is one of the period's public holidays.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.public_holidays.iter().any(|h| h.date == date)
    }

    /// Returns the holiday dates of this period.
    pub fn holiday_dates(&self) -> HashSet<NaiveDate> {
        self.public_holidays.iter().map(|h| h.date).collect()
    }
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}
