//! Worklog retrieval for the report.

use std::collections::HashSet;

use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::calculation::get_day_type;
use crate::error::{EngineError, EngineResult};
use crate::submission::{JiraClient, describe_failure};

use super::{DailyWorklogs, ReportLine};

/// Issues requested per search page.
pub const SEARCH_PAGE_SIZE: u32 = 50;

const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    issues: Vec<SearchIssue>,
    #[serde(default)]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    key: String,
    #[serde(default)]
    fields: SearchFields,
}

#[derive(Debug, Default, Deserialize)]
struct SearchFields {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorklogPage {
    #[serde(default)]
    worklogs: Vec<WorklogBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorklogBody {
    #[serde(default)]
    author: Option<AuthorBody>,
    started: String,
    #[serde(default)]
    time_spent_seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
}

impl AuthorBody {
    fn is(&self, username: &str) -> bool {
        [&self.name, &self.account_id, &self.email_address]
            .into_iter()
            .flatten()
            .any(|candidate| candidate == username)
    }
}

/// JQL selecting issues the user logged work on between `start` and `end`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use worklog_engine::report::worklog_jql;
///
/// let jql = worklog_jql(
///     "jdoe",
///     NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
/// );
/// assert_eq!(
///     jql,
///     r#"worklogAuthor = "jdoe" AND worklogDate >= "2025-08-01" AND worklogDate <= "2025-08-31""#
/// );
/// ```
pub fn worklog_jql(username: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        r#"worklogAuthor = "{}" AND worklogDate >= "{}" AND worklogDate <= "{}""#,
        username.replace('"', "\\\""),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Fetches the worklogs `username` recorded on working days in a range.
///
/// Issues are found with a paginated JQL search, then each issue's
/// worklogs are read and filtered to those authored by the user (matched
/// on name, account id or email), started inside `start..=end`, on a
/// weekday and not in `holidays`.
///
/// # Errors
///
/// - [`EngineError::InvalidDateRange`] when `end < start`.
/// - [`EngineError::Http`] when the search fails. A failing worklog
///   request for a single issue is logged and that issue is skipped.
pub async fn fetch_worklogs(
    client: &JiraClient,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HashSet<NaiveDate>,
) -> EngineResult<DailyWorklogs> {
    if end < start {
        return Err(EngineError::InvalidDateRange { start, end });
    }

    let issues = search_issues(client, &worklog_jql(username, start, end)).await?;
    let mut days = DailyWorklogs::new();

    for issue in issues {
        let summary = issue.fields.summary.unwrap_or_default();
        let url = client.api_url(&format!("issue/{}/worklog", issue.key));
        let response = client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            let reason = describe_failure(response).await;
            warn!(issue = %issue.key, error = %reason, "skipping issue, worklogs not readable");
            continue;
        }

        let page: WorklogPage = response.json().await?;
        for line in collect_lines(&issue.key, &summary, page.worklogs, username, start, end, holidays) {
            days.entry(line.date).or_default().push(line);
        }
    }

    info!(
        user = username,
        start = %start,
        end = %end,
        days = days.len(),
        "worklogs fetched"
    );
    Ok(days)
}

async fn search_issues(client: &JiraClient, jql: &str) -> EngineResult<Vec<SearchIssue>> {
    let url = client.api_url("search");
    let mut issues = Vec::new();
    let mut start_at: u32 = 0;

    loop {
        let response = client
            .get(&url)
            .query(&[
                ("jql", jql.to_string()),
                ("fields", "summary".to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", SEARCH_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(EngineError::Http {
                message: format!("issue search failed, {}", describe_failure(response).await),
            });
        }

        let page: SearchPage = response.json().await?;
        let received = page.issues.len();
        issues.extend(page.issues);
        debug!(start_at, received, total = page.total, "search page");

        if received == 0 || start_at + SEARCH_PAGE_SIZE >= page.total {
            break;
        }
        start_at += SEARCH_PAGE_SIZE;
    }

    Ok(issues)
}

fn collect_lines(
    issue: &str,
    summary: &str,
    worklogs: Vec<WorklogBody>,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HashSet<NaiveDate>,
) -> Vec<ReportLine> {
    worklogs
        .into_iter()
        .filter(|w| w.author.as_ref().is_some_and(|a| a.is(username)))
        .filter_map(|w| {
            let date = w
                .started
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())?;
            Some((date, w.time_spent_seconds))
        })
        .filter(|(date, _)| *date >= start && *date <= end)
        .filter(|(date, _)| !get_day_type(*date).is_weekend() && !holidays.contains(date))
        .map(|(date, seconds)| ReportLine {
            date,
            issue: issue.to_string(),
            summary: summary.to_string(),
            hours: seconds_to_hours(seconds),
        })
        .collect()
}

fn seconds_to_hours(seconds: u64) -> Decimal {
    (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn worklogs(json: &str) -> Vec<WorklogBody> {
        serde_json::from_str::<WorklogPage>(json).unwrap().worklogs
    }

    #[test]
    fn test_seconds_to_hours_rounds_to_two_places() {
        assert_eq!(seconds_to_hours(9000), dec("2.5"));
        assert_eq!(seconds_to_hours(28800), dec("8"));
        assert_eq!(seconds_to_hours(1000), dec("0.28"));
    }

    #[test]
    fn test_jql_escapes_quotes() {
        let jql = worklog_jql(r#"a"b"#, d(8, 1), d(8, 31));
        assert!(jql.starts_with(r#"worklogAuthor = "a\"b""#));
    }

    #[test]
    fn test_collect_lines_filters_author_range_and_working_days() {
        // 2025-08-16 is a Saturday, 2025-08-29 a holiday.
        let json = r#"{"worklogs": [
            {"author": {"name": "jdoe"}, "started": "2025-08-19T16:00:00.000+0200", "timeSpentSeconds": 21600},
            {"author": {"name": "other"}, "started": "2025-08-19T16:00:00.000+0200", "timeSpentSeconds": 3600},
            {"author": {"accountId": "jdoe"}, "started": "2025-08-20T09:00:00.000+0200", "timeSpentSeconds": 7200},
            {"author": {"name": "jdoe"}, "started": "2025-08-16T16:00:00.000+0200", "timeSpentSeconds": 3600},
            {"author": {"name": "jdoe"}, "started": "2025-08-29T16:00:00.000+0200", "timeSpentSeconds": 3600},
            {"author": {"name": "jdoe"}, "started": "2025-09-01T16:00:00.000+0200", "timeSpentSeconds": 3600},
            {"started": "2025-08-21T16:00:00.000+0200", "timeSpentSeconds": 3600},
            {"author": {"name": "jdoe"}, "started": "garbage", "timeSpentSeconds": 3600}
        ]}"#;
        let holidays = HashSet::from([d(8, 29)]);

        let lines = collect_lines(
            "SINT-1",
            "Support",
            worklogs(json),
            "jdoe",
            d(8, 1),
            d(8, 31),
            &holidays,
        );

        let got: Vec<(NaiveDate, Decimal)> = lines.iter().map(|l| (l.date, l.hours)).collect();
        assert_eq!(got, vec![(d(8, 19), dec("6")), (d(8, 20), dec("2"))]);
        assert!(lines.iter().all(|l| l.issue == "SINT-1" && l.summary == "Support"));
    }

    #[test]
    fn test_author_matches_email() {
        let json = r#"{"worklogs": [
            {"author": {"emailAddress": "jdoe@example.com"}, "started": "2025-08-19T16:00:00.000+0200", "timeSpentSeconds": 1800}
        ]}"#;
        let lines = collect_lines(
            "SINT-1",
            "",
            worklogs(json),
            "jdoe@example.com",
            d(8, 1),
            d(8, 31),
            &HashSet::new(),
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].hours, dec("0.5"));
    }
}
