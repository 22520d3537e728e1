//! Worklog report.
//!
//! The read side of the tool: fetch the worklogs a user already recorded
//! in a period and print them grouped by day with a per-day total.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use worklog_engine::report::{ReportLine, render_report};
//!
//! let date = NaiveDate::from_ymd_opt(2025, 8, 19).unwrap();
//! let mut days = BTreeMap::new();
//! days.insert(date, vec![ReportLine {
//!     date,
//!     issue: "SINT-1".to_string(),
//!     summary: "Support".to_string(),
//!     hours: Decimal::new(600, 2),
//! }]);
//!
//! let text = render_report("August 2025", &days);
//! assert!(text.contains("2025-08-19 |  6.00 | SINT-1     | Support"));
//! ```

mod fetch;
mod render;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use fetch::{SEARCH_PAGE_SIZE, fetch_worklogs, worklog_jql};
pub use render::{render_report, report_title};

/// One recorded worklog as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Day the work was started.
    pub date: NaiveDate,
    /// Issue key.
    pub issue: String,
    /// Issue summary.
    pub summary: String,
    /// Hours spent, rounded to two decimal places.
    pub hours: Decimal,
}

/// Report lines grouped by day, ascending. Days without worklogs are absent.
pub type DailyWorklogs = BTreeMap<NaiveDate, Vec<ReportLine>>;
