//! REST API submission back end.

use async_trait::async_trait;
use chrono::NaiveTime;
use reqwest::StatusCode;
use serde::Serialize;

use crate::calculation::rest_started_timestamp;
use crate::error::{EngineError, EngineResult};
use crate::models::WorklogEntry;

use super::WorklogSubmitter;
use super::client::{JiraClient, describe_failure};

/// Request body of `POST /issue/{key}/worklog`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorklogPayload {
    started: String,
    time_spent_seconds: u64,
}

/// Creates worklogs through the Jira REST API.
///
/// An entry is accepted only when the tracker answers `201 Created`.
#[derive(Debug, Clone)]
pub struct RestSubmitter {
    client: JiraClient,
}

impl RestSubmitter {
    /// Wraps an authenticated client.
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WorklogSubmitter for RestSubmitter {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn submit(&self, entry: &WorklogEntry, start_time: NaiveTime) -> EngineResult<()> {
        let payload = WorklogPayload {
            started: rest_started_timestamp(entry.date, start_time)?,
            time_spent_seconds: entry.seconds(),
        };
        let url = self
            .client
            .api_url(&format!("issue/{}/worklog", entry.ticket_id));

        let response = self.client.post(&url).json(&payload).send().await?;
        if response.status() == StatusCode::CREATED {
            return Ok(());
        }

        Err(EngineError::Submission {
            ticket_id: entry.ticket_id.clone(),
            date: entry.date,
            message: describe_failure(response).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_uses_jira_field_names() {
        let payload = WorklogPayload {
            started: "2025-08-19T16:00:00.000+0200".to_string(),
            time_spent_seconds: 9000,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "started": "2025-08-19T16:00:00.000+0200",
                "timeSpentSeconds": 9000
            })
        );
    }
}
