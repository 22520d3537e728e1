//! Submission of planned worklogs to Jira.
//!
//! The allocation core only produces (ticket, day, minutes) triples. This
//! module hands them to the tracker through one of two back ends behind the
//! [`WorklogSubmitter`] trait:
//!
//! - [`RestSubmitter`] posts JSON to the REST worklog endpoint.
//! - [`FormSubmitter`] posts the classic "Log work" web form.
//!
//! Entries are submitted one after another and never retried.

mod client;
mod form;
mod rest;

use async_trait::async_trait;
use chrono::NaiveTime;
use tracing::{info, warn};

use crate::calculation::format_duration;
use crate::error::EngineResult;
use crate::models::{AllocationPlan, SubmissionFailure, SubmissionReport, WorklogEntry};

pub use client::{JiraAuth, JiraClient, ResolvedIssue, TOKEN_ENV_VAR, extract_issue_key};
pub(crate) use client::describe_failure;
pub use form::FormSubmitter;
pub use rest::RestSubmitter;

/// A back end that records one worklog entry in the tracker.
#[async_trait]
pub trait WorklogSubmitter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Records `entry`, starting at `start_time` on the entry's date.
    async fn submit(&self, entry: &WorklogEntry, start_time: NaiveTime) -> EngineResult<()>;
}

/// Submits every entry of `plan` in order and reports the outcome.
///
/// A rejected entry does not stop the run; it is logged and recorded in
/// the returned report.
pub async fn submit_plan<S>(
    submitter: &S,
    plan: &AllocationPlan,
    start_time: NaiveTime,
) -> SubmissionReport
where
    S: WorklogSubmitter + ?Sized,
{
    let mut report = SubmissionReport::default();

    for entry in plan.entries() {
        report.planned += 1;
        match submitter.submit(entry, start_time).await {
            Ok(()) => {
                report.succeeded += 1;
                info!(
                    backend = submitter.name(),
                    date = %entry.date,
                    ticket = %entry.ticket_id,
                    duration = %format_duration(u64::from(entry.minutes)),
                    "worklog recorded"
                );
            }
            Err(err) => {
                warn!(
                    backend = submitter.name(),
                    date = %entry.date,
                    ticket = %entry.ticket_id,
                    error = %err,
                    "worklog rejected"
                );
                report.failures.push(SubmissionFailure {
                    ticket_id: entry.ticket_id.clone(),
                    date: entry.date,
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        backend = submitter.name(),
        planned = report.planned,
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "submission finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{DayPlan, PlanTotals, WorkPeriod};
    use chrono::{NaiveDate, Utc};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Records calls and rejects one ticket.
    struct RecordingSubmitter {
        reject: &'static str,
        calls: Mutex<Vec<(String, NaiveDate, u32)>>,
    }

    #[async_trait]
    impl WorklogSubmitter for RecordingSubmitter {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn submit(&self, entry: &WorklogEntry, _start_time: NaiveTime) -> EngineResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push((entry.ticket_id.clone(), entry.date, entry.minutes));
            if entry.ticket_id == self.reject {
                return Err(EngineError::Submission {
                    ticket_id: entry.ticket_id.clone(),
                    date: entry.date,
                    message: "HTTP 400: bad".to_string(),
                });
            }
            Ok(())
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn entry(id: &str, day: u32, minutes: u32) -> WorklogEntry {
        WorklogEntry {
            ticket_id: id.to_string(),
            label: None,
            date: d(day),
            minutes,
        }
    }

    fn plan() -> AllocationPlan {
        let days = vec![
            DayPlan {
                date: d(2),
                entries: vec![entry("A", 2, 360), entry("B", 2, 120)],
            },
            DayPlan {
                date: d(3),
                entries: vec![entry("A", 3, 360), entry("B", 3, 120)],
            },
        ];
        AllocationPlan {
            plan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: "test".to_string(),
            period: WorkPeriod::new(d(2), d(3)),
            totals: PlanTotals::from_days(&days),
            days,
        }
    }

    fn four_pm() -> NaiveTime {
        NaiveTime::from_hms_opt(16, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_every_entry_is_submitted_in_order() {
        let submitter = RecordingSubmitter {
            reject: "none",
            calls: Mutex::new(Vec::new()),
        };
        let report = submit_plan(&submitter, &plan(), four_pm()).await;

        assert!(report.is_complete());
        assert_eq!(report.planned, 4);
        assert_eq!(report.succeeded, 4);
        let calls = submitter.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("A".to_string(), d(2), 360),
                ("B".to_string(), d(2), 120),
                ("A".to_string(), d(3), 360),
                ("B".to_string(), d(3), 120),
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_are_reported_without_stopping() {
        let submitter = RecordingSubmitter {
            reject: "B",
            calls: Mutex::new(Vec::new()),
        };
        let report = submit_plan(&submitter, &plan(), four_pm()).await;

        assert!(!report.is_complete());
        assert_eq!(report.planned, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].ticket_id, "B");
        assert!(report.failures[0].message.contains("HTTP 400"));
        assert_eq!(submitter.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let submitter: Box<dyn WorklogSubmitter> = Box::new(RecordingSubmitter {
            reject: "none",
            calls: Mutex::new(Vec::new()),
        });
        let report = submit_plan(submitter.as_ref(), &plan(), four_pm()).await;
        assert_eq!(report.succeeded, 4);
    }
}
