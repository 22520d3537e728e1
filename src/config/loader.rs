//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the worklog
//! configuration and holiday calendars from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::calculation::{AllocationSettings, parse_time_of_day};
use crate::error::{EngineError, EngineResult};
use crate::models::{PublicHoliday, Ticket, WorkPeriod};

use super::types::{HolidayFile, JiraSettings, WorklogConfig};

/// Loads and provides access to the worklog configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── worklog.yaml        # Jira connection, allocation settings, tickets
/// └── holidays/
///     └── 2025.yaml       # Public holidays, one file per year or region
/// ```
///
/// A missing `holidays/` directory is allowed and means no holidays.
///
/// # Example
///
/// ```no_run
/// use worklog_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let period = loader.period(
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
/// );
/// println!("{} holidays in January", period.public_holidays.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: WorklogConfig,
    holidays: Vec<PublicHoliday>,
    start_time: NaiveTime,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when `worklog.yaml` is missing.
    /// - [`EngineError::ConfigParseError`] when any file contains invalid
    ///   YAML or a required field is missing.
    /// - [`EngineError::InvalidTicket`] for blank or duplicate ticket ids.
    /// - [`EngineError::InvalidRoundStep`] for a zero rounding step.
    /// - [`EngineError::InvalidTimeOfDay`] for a malformed start time.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<WorklogConfig>(&path.join("worklog.yaml"))?;
        let holidays = Self::load_holidays(&path.join("holidays"))?;

        let loader = Self::from_parts(config, holidays)?;
        debug!(
            path = %path.display(),
            tickets = loader.config.tickets.len(),
            holidays = loader.holidays.len(),
            "configuration loaded"
        );
        Ok(loader)
    }

    /// Builds a loader from already parsed parts, applying the same checks
    /// as [`ConfigLoader::load`].
    pub fn from_parts(config: WorklogConfig, mut holidays: Vec<PublicHoliday>) -> EngineResult<Self> {
        validate_tickets(&config.tickets)?;
        if config.allocation.round_step == 0 {
            return Err(EngineError::InvalidRoundStep { step: 0 });
        }
        let start_time = parse_time_of_day(&config.start_time)?;

        holidays.sort_by_key(|h| h.date);
        Ok(Self {
            config,
            holidays,
            start_time,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all holiday files from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<PublicHoliday>> {
        let holidays_dir_str = holidays_dir.display().to_string();

        if !holidays_dir.exists() {
            warn!(path = %holidays_dir_str, "no holidays directory, holidays will not be skipped");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: holidays_dir_str.clone(),
        })?;

        let mut holidays = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: holidays_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                let file = Self::load_yaml::<HolidayFile>(&path)?;
                holidays.extend(file.into_public_holidays());
            }
        }

        Ok(holidays)
    }

    /// Returns the parsed `worklog.yaml`.
    pub fn config(&self) -> &WorklogConfig {
        &self.config
    }

    /// Returns the Jira connection settings.
    pub fn jira(&self) -> &JiraSettings {
        &self.config.jira
    }

    /// Returns the allocation settings.
    pub fn allocation(&self) -> &AllocationSettings {
        &self.config.allocation
    }

    /// Returns the configured tickets, tracked or not, in order.
    pub fn tickets(&self) -> &[Ticket] {
        &self.config.tickets
    }

    /// Returns every known public holiday, sorted by date.
    pub fn holidays(&self) -> &[PublicHoliday] {
        &self.holidays
    }

    /// Returns the set of holiday dates.
    pub fn holiday_dates(&self) -> HashSet<NaiveDate> {
        self.holidays.iter().map(|h| h.date).collect()
    }

    /// Returns the time of day at which worklogs start.
    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// Builds a work period carrying the holidays that fall inside it.
    pub fn period(&self, start: NaiveDate, end: NaiveDate) -> WorkPeriod {
        WorkPeriod::new(start, end).with_holidays(&self.holidays)
    }
}

/// Rejects blank and duplicate ticket ids.
fn validate_tickets(tickets: &[Ticket]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for ticket in tickets {
        if ticket.id.trim().is_empty() {
            return Err(EngineError::InvalidTicket {
                id: ticket.id.clone(),
                message: "ticket id must not be empty".to_string(),
            });
        }
        if !seen.insert(ticket.id.as_str()) {
            return Err(EngineError::InvalidTicket {
                id: ticket.id.clone(),
                message: "ticket is listed more than once".to_string(),
            });
        }
    }
    Ok(())
}
