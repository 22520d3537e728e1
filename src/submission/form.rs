//! Web form submission back end.
//!
//! Some Jira Server instances only allow time logging through the classic
//! "Log work" dialog. This back end posts the same fields that dialog
//! submits, so the tracker treats the entry as if it had been typed in.

use async_trait::async_trait;
use chrono::NaiveTime;
use reqwest::header::HeaderName;

use crate::calculation::{form_date, format_duration};
use crate::error::{EngineError, EngineResult};
use crate::models::WorklogEntry;

use super::WorklogSubmitter;
use super::client::{JiraClient, describe_failure};

/// Path of the "Log work" form action.
const CREATE_WORKLOG_PATH: &str = "/secure/CreateWorklog.jspa";

/// Header that lets form posts through Jira's XSRF check.
const XSRF_HEADER: HeaderName = HeaderName::from_static("x-atlassian-token");

/// Creates worklogs through the web form endpoint.
///
/// Any 2xx or 3xx answer counts as accepted.
#[derive(Debug, Clone)]
pub struct FormSubmitter {
    client: JiraClient,
}

impl FormSubmitter {
    /// Wraps an authenticated client.
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }

    /// Form fields for one entry, in the order the dialog sends them.
    pub fn form_fields(entry: &WorklogEntry, start_time: NaiveTime) -> Vec<(&'static str, String)> {
        vec![
            ("id", entry.ticket_id.clone()),
            ("timeLogged", format_duration(u64::from(entry.minutes))),
            ("startDate", form_date(entry.date, start_time)),
            ("adjustEstimate", "auto".to_string()),
        ]
    }
}

#[async_trait]
impl WorklogSubmitter for FormSubmitter {
    fn name(&self) -> &'static str {
        "form"
    }

    async fn submit(&self, entry: &WorklogEntry, start_time: NaiveTime) -> EngineResult<()> {
        let url = format!("{}{}", self.client.base_url(), CREATE_WORKLOG_PATH);
        let fields = Self::form_fields(entry, start_time);

        let response = self
            .client
            .post(&url)
            .header(XSRF_HEADER, "no-check")
            .form(&fields)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(());
        }

        Err(EngineError::Submission {
            ticket_id: entry.ticket_id.clone(),
            date: entry.date,
            message: describe_failure(response).await,
        })
    }
}
