//! Configuration loading and management for the worklog engine.
//!
//! This module provides functionality to load the worklog configuration from
//! YAML files, including the Jira connection, allocation settings, the ticket
//! list and public holiday calendars.
//!
//! # Example
//!
//! ```no_run
//! use worklog_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Logging to: {}", config.jira().base_url);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{HolidayDate, HolidayFile, JiraFlavor, JiraSettings, WorklogConfig};
