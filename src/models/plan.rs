//! Allocation plan models.
//!
//! This module contains the [`AllocationPlan`] type and the structures it is
//! built from: per-day plans, individual worklog entries and aggregated
//! totals. It also holds the [`SubmissionReport`] produced after a plan has
//! been handed to a submission back end.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WorkPeriod;

/// A single (ticket, day, minutes) triple ready for submission.
///
/// # Example
///
/// ```
/// use worklog_engine::models::WorklogEntry;
/// use chrono::NaiveDate;
///
/// let entry = WorklogEntry {
///     ticket_id: "SINT-1234".to_string(),
///     label: None,
///     date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
///     minutes: 150,
/// };
/// assert_eq!(entry.seconds(), 9000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklogEntry {
    /// The ticket the time is logged against.
    pub ticket_id: String,
    /// The ticket label, if one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The working day the entry belongs to.
    pub date: NaiveDate,
    /// Minutes to log. Always greater than zero.
    pub minutes: u32,
}

impl WorklogEntry {
    /// Duration in seconds, as expected by the REST API.
    pub fn seconds(&self) -> u64 {
        u64::from(self.minutes) * 60
    }
}

/// The entries planned for one working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// The working day.
    pub date: NaiveDate,
    /// Entries with a positive number of minutes, in subset order.
    pub entries: Vec<WorklogEntry>,
}

impl DayPlan {
    /// Sum of all minutes planned for the day.
    pub fn total_minutes(&self) -> u32 {
        self.entries.iter().map(|e| e.minutes).sum()
    }
}

/// Aggregated totals over a whole plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanTotals {
    /// Number of working days in the plan.
    pub working_days: u32,
    /// Number of worklog entries across all days.
    pub entries: u32,
    /// Minutes across all days.
    pub total_minutes: u64,
    /// Minutes per ticket id.
    pub minutes_by_ticket: BTreeMap<String, u64>,
}

impl PlanTotals {
    /// Computes the totals for a list of day plans.
    pub fn from_days(days: &[DayPlan]) -> Self {
        let mut totals = PlanTotals {
            working_days: days.len() as u32,
            ..Default::default()
        };
        for entry in days.iter().flat_map(|d| &d.entries) {
            totals.entries += 1;
            totals.total_minutes += u64::from(entry.minutes);
            *totals
                .minutes_by_ticket
                .entry(entry.ticket_id.clone())
                .or_default() += u64::from(entry.minutes);
        }
        totals
    }
}

/// The complete allocation for a work period.
///
/// # Example
///
/// ```
/// use worklog_engine::models::{AllocationPlan, PlanTotals, WorkPeriod};
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let plan = AllocationPlan {
///     plan_id: Uuid::new_v4(),
///     generated_at: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     period: WorkPeriod::new(
///         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
///     ),
///     days: vec![],
///     totals: PlanTotals::default(),
/// };
/// assert_eq!(plan.entries().count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Unique identifier for this plan.
    pub plan_id: Uuid,
    /// When the plan was generated.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the plan.
    pub engine_version: String,
    /// The period the plan covers.
    pub period: WorkPeriod,
    /// One plan per working day, ascending.
    pub days: Vec<DayPlan>,
    /// Aggregated totals.
    pub totals: PlanTotals,
}

impl AllocationPlan {
    /// Iterates every entry of every day, in submission order.
    pub fn entries(&self) -> impl Iterator<Item = &WorklogEntry> {
        self.days.iter().flat_map(|d| d.entries.iter())
    }
}

/// A worklog entry the tracker did not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    /// The ticket of the rejected entry.
    pub ticket_id: String,
    /// The day of the rejected entry.
    pub date: NaiveDate,
    /// Description returned by the submission back end.
    pub message: String,
}

/// Outcome of submitting a plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Number of entries handed to the back end.
    pub planned: u32,
    /// Number of entries the back end accepted.
    pub succeeded: u32,
    /// Entries that were rejected.
    pub failures: Vec<SubmissionFailure>,
}

impl SubmissionReport {
    /// True when there was something to submit and all of it went through.
    pub fn is_complete(&self) -> bool {
        self.planned > 0 && self.failures.is_empty()
    }
}
