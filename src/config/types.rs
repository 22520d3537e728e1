//! Configuration types for worklog allocation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{AllocationSettings, DEFAULT_START_TIME};
use crate::models::{PublicHoliday, Ticket};

/// The kind of Jira deployment, which decides authentication and API path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JiraFlavor {
    /// Atlassian Cloud: basic auth with account email and API token.
    #[default]
    Cloud,
    /// Server or Data Center: bearer personal access token.
    Server,
}

impl JiraFlavor {
    /// REST API version used when none is configured.
    pub fn default_api_version(self) -> &'static str {
        match self {
            JiraFlavor::Cloud => "3",
            JiraFlavor::Server => "2",
        }
    }
}

/// Connection details for the Jira instance.
///
/// The API token itself is never stored here; it is read from the
/// environment when a client is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraSettings {
    /// Base URL, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    /// Deployment kind.
    #[serde(default)]
    pub flavor: JiraFlavor,
    /// Account email (Cloud) or user name (Server).
    pub username: String,
    /// REST API version override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl JiraSettings {
    /// The REST API version to use.
    pub fn api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or_else(|| self.flavor.default_api_version())
    }
}

/// The contents of `worklog.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklogConfig {
    /// Jira connection.
    pub jira: JiraSettings,
    /// Allocation settings.
    #[serde(default)]
    pub allocation: AllocationSettings,
    /// Time of day (`HH:MM`) at which every worklog starts.
    #[serde(default = "default_start_time")]
    pub start_time: String,
    /// Tickets in allocation order.
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

fn default_start_time() -> String {
    DEFAULT_START_TIME.to_string()
}

/// A single date in a holidays file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDate {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// A holidays file from the `holidays/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayFile {
    /// Region code shared by every date in the file.
    #[serde(default)]
    pub region: String,
    /// The holidays.
    pub holidays: Vec<HolidayDate>,
}

impl HolidayFile {
    /// Expands the file into [`PublicHoliday`] values tagged with its region.
    pub fn into_public_holidays(self) -> Vec<PublicHoliday> {
        let region = self.region;
        self.holidays
            .into_iter()
            .map(|h| PublicHoliday {
                date: h.date,
                name: h.name,
                region: region.clone(),
            })
            .collect()
    }
}
