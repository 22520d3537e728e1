//! Jira REST client.
//!
//! [`JiraClient`] owns the HTTP client, the base URL and the credentials,
//! and offers the small set of read calls the rest of the crate needs:
//! an authentication check, issue resolution and raw GET access for the
//! report.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{JiraFlavor, JiraSettings};
use crate::error::{EngineError, EngineResult};

/// Environment variable holding the Jira API token or personal access token.
pub const TOKEN_ENV_VAR: &str = "JIRA_API_TOKEN";

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Longest response body excerpt kept in error messages.
const BODY_EXCERPT_CHARS: usize = 500;

static BROWSE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/browse/([A-Z][A-Z0-9_]+-\d+)").unwrap());

static ISSUE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]+-\d+$").unwrap());

/// Credentials attached to every request.
#[derive(Clone)]
pub enum JiraAuth {
    /// Cloud: account email and API token.
    Basic {
        /// Account email.
        username: String,
        /// API token.
        token: String,
    },
    /// Server / Data Center: personal access token.
    Bearer {
        /// Personal access token.
        token: String,
    },
}

impl std::fmt::Debug for JiraAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JiraAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("token", &"***")
                .finish(),
            JiraAuth::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}

impl JiraAuth {
    /// Picks the scheme matching the deployment flavor.
    pub fn for_flavor(flavor: JiraFlavor, username: &str, token: impl Into<String>) -> Self {
        match flavor {
            JiraFlavor::Cloud => JiraAuth::Basic {
                username: username.to_string(),
                token: token.into(),
            },
            JiraFlavor::Server => JiraAuth::Bearer {
                token: token.into(),
            },
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            JiraAuth::Basic { username, token } => request.basic_auth(username, Some(token)),
            JiraAuth::Bearer { token } => request.bearer_auth(token),
        }
    }
}

/// A resolved issue key with its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIssue {
    /// Canonical, upper-case issue key.
    pub key: String,
    /// Issue summary; empty when the tracker returned none.
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct IssueBody {
    key: String,
    #[serde(default)]
    fields: IssueFieldsBody,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFieldsBody {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    issues: Vec<IssueBody>,
}

impl From<IssueBody> for ResolvedIssue {
    fn from(issue: IssueBody) -> Self {
        ResolvedIssue {
            key: issue.key.to_uppercase(),
            summary: issue.fields.summary.unwrap_or_default(),
        }
    }
}

/// Thin wrapper around [`reqwest::Client`] bound to one Jira instance.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_url: String,
    api_version: String,
    auth: JiraAuth,
}

impl JiraClient {
    /// Builds a client for `settings` with an explicit token.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] when the HTTP client cannot be built.
    pub fn new(settings: &JiraSettings, token: impl Into<String>) -> EngineResult<Self> {
        let auth = JiraAuth::for_flavor(settings.flavor, &settings.username, token);
        Self::with_auth(&settings.base_url, settings.api_version(), auth)
    }

    /// Builds a client reading the token from [`TOKEN_ENV_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingCredentials`] when the variable is
    /// unset or blank.
    pub fn from_env(settings: &JiraSettings) -> EngineResult<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| EngineError::MissingCredentials {
                variable: TOKEN_ENV_VAR.to_string(),
            })?;
        Self::new(settings, token.trim())
    }

    /// Builds a client from its parts.
    pub fn with_auth(base_url: &str, api_version: &str, auth: JiraAuth) -> EngineResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            auth,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a REST resource, e.g. `issue/SINT-1/worklog`.
    pub fn api_url(&self, resource: &str) -> String {
        format!(
            "{}/rest/api/{}/{}",
            self.base_url,
            self.api_version,
            resource.trim_start_matches('/')
        )
    }

    /// Authenticated GET request.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.auth.apply(self.http.get(url))
    }

    /// Authenticated POST request.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.auth.apply(self.http.post(url))
    }

    /// Verifies the credentials with `GET /myself`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AuthenticationFailed`] for any status other
    /// than 200 and [`EngineError::Http`] for transport failures.
    pub async fn check_auth(&self) -> EngineResult<()> {
        let response = self.get(&self.api_url("myself")).send().await?;
        if response.status() == StatusCode::OK {
            info!(base_url = %self.base_url, "jira authentication succeeded");
            return Ok(());
        }
        Err(EngineError::AuthenticationFailed {
            message: format!("/myself {}", describe_failure(response).await),
        })
    }

    /// Resolves a key, browse URL or numeric id to a key and summary.
    ///
    /// Numeric ids that the issue endpoint does not accept are looked up
    /// through a JQL `id=` search.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidTicket`] for blank input.
    /// - [`EngineError::IssueNotFound`] when the issue cannot be found.
    /// - [`EngineError::Http`] for transport failures.
    pub async fn resolve_issue(&self, raw: &str) -> EngineResult<ResolvedIssue> {
        let candidate = extract_issue_key(raw);
        if candidate.is_empty() {
            return Err(EngineError::InvalidTicket {
                id: raw.to_string(),
                message: "issue key must not be empty".to_string(),
            });
        }

        let response = self
            .get(&self.api_url(&format!("issue/{candidate}")))
            .query(&[("fields", "key,summary")])
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            let issue: IssueBody = response.json().await?;
            let resolved = ResolvedIssue::from(issue);
            debug!(input = raw, key = %resolved.key, "issue resolved");
            return Ok(resolved);
        }

        if candidate.chars().all(|c| c.is_ascii_digit()) {
            return self.search_by_id(raw, &candidate).await;
        }

        Err(EngineError::IssueNotFound {
            input: raw.to_string(),
            message: describe_failure(response).await,
        })
    }

    async fn search_by_id(&self, raw: &str, id: &str) -> EngineResult<ResolvedIssue> {
        let jql = format!("id={id}");
        let response = self
            .get(&self.api_url("search"))
            .query(&[("jql", jql.as_str()), ("fields", "key,summary")])
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            let body: SearchBody = response.json().await?;
            if let Some(issue) = body.issues.into_iter().next() {
                return Ok(issue.into());
            }
        }

        Err(EngineError::IssueNotFound {
            input: raw.to_string(),
            message: "numeric id could not be resolved, use an issue key such as SINT-1234"
                .to_string(),
        })
    }
}

/// Extracts an issue key from free text.
///
/// Browse URLs yield the key after `/browse/`; bare keys are accepted in
/// any case. Both are returned upper-cased. Anything else, such as a
/// numeric id, is returned trimmed but otherwise unchanged.
///
/// # Example
///
/// ```
/// use worklog_engine::submission::extract_issue_key;
///
/// assert_eq!(extract_issue_key("https://x.atlassian.net/browse/sint-12"), "SINT-12");
/// assert_eq!(extract_issue_key(" sint-12 "), "SINT-12");
/// assert_eq!(extract_issue_key("147331"), "147331");
/// ```
pub fn extract_issue_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(caps) = BROWSE_URL_RE.captures(trimmed) {
        return caps[1].to_uppercase();
    }
    let upper = trimmed.to_uppercase();
    if ISSUE_KEY_RE.is_match(&upper) {
        return upper;
    }
    trimmed.to_string()
}

/// `"HTTP <status>: <body excerpt>"` for an unsuccessful response.
pub(crate) async fn describe_failure(response: Response) -> String {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    format!("HTTP {status}: {excerpt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(flavor: JiraFlavor) -> JiraSettings {
        JiraSettings {
            base_url: "https://example.atlassian.net/".to_string(),
            flavor,
            username: "someone@example.com".to_string(),
            api_version: None,
        }
    }

    #[test]
    fn test_extract_key_from_browse_url() {
        assert_eq!(
            extract_issue_key("https://example.atlassian.net/browse/SINT-1234?focused=1"),
            "SINT-1234"
        );
        assert_eq!(extract_issue_key("http://jira/browse/ab_c-7"), "AB_C-7");
    }

    #[test]
    fn test_extract_plain_key_is_uppercased() {
        assert_eq!(extract_issue_key("sint-1234"), "SINT-1234");
        assert_eq!(extract_issue_key("  SINT-1 \n"), "SINT-1");
    }

    #[test]
    fn test_extract_leaves_other_input_untouched() {
        assert_eq!(extract_issue_key("147331"), "147331");
        assert_eq!(extract_issue_key("not a key"), "not a key");
        assert_eq!(extract_issue_key("S-1"), "S-1");
        assert_eq!(extract_issue_key(""), "");
    }

    #[test]
    fn test_api_url_uses_flavor_version_and_trims_slashes() {
        let cloud = JiraClient::new(&settings(JiraFlavor::Cloud), "t").unwrap();
        assert_eq!(cloud.base_url(), "https://example.atlassian.net");
        assert_eq!(
            cloud.api_url("/issue/SINT-1/worklog"),
            "https://example.atlassian.net/rest/api/3/issue/SINT-1/worklog"
        );

        let server = JiraClient::new(&settings(JiraFlavor::Server), "t").unwrap();
        assert_eq!(
            server.api_url("myself"),
            "https://example.atlassian.net/rest/api/2/myself"
        );
    }

    #[test]
    fn test_auth_scheme_follows_flavor() {
        assert!(matches!(
            JiraAuth::for_flavor(JiraFlavor::Cloud, "a@b.c", "t"),
            JiraAuth::Basic { .. }
        ));
        assert!(matches!(
            JiraAuth::for_flavor(JiraFlavor::Server, "a", "t"),
            JiraAuth::Bearer { .. }
        ));
    }

    #[test]
    fn test_debug_output_hides_token() {
        let auth = JiraAuth::for_flavor(JiraFlavor::Cloud, "a@b.c", "secret-token");
        let printed = format!("{:?}", auth);
        assert!(printed.contains("a@b.c"));
        assert!(!printed.contains("secret-token"));
    }
}
