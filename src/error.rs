//! Error types for the worklog engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report, from configuration loading
//! through allocation to submission.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the worklog engine.
///
/// All fallible operations in the engine return this error type. The
/// allocation core has exactly one failure mode of its own,
/// [`EngineError::AllocationFailed`]; the remaining variants belong to the
/// configuration, calendar and submission layers around it.
///
/// # Example
///
/// ```
/// use worklog_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/worklog.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/worklog.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The requested date range ends before it starts.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// The rounding step must be a positive number of minutes.
    #[error("Rounding step must be positive, got {step}")]
    InvalidRoundStep {
        /// The rejected step.
        step: u32,
    },

    /// A ticket definition was invalid.
    #[error("Invalid ticket '{id}': {message}")]
    InvalidTicket {
        /// The ticket identifier as supplied.
        id: String,
        /// A description of what made the ticket invalid.
        message: String,
    },

    /// The allocator could not distribute the total under the given weights.
    #[error("Cannot allocate {total} minutes: {message}")]
    AllocationFailed {
        /// The daily total that could not be satisfied.
        total: u32,
        /// A description of the failure.
        message: String,
    },

    /// A time of day was not in `HH:MM` form.
    #[error("Invalid time of day '{value}', expected HH:MM")]
    InvalidTimeOfDay {
        /// The rejected value.
        value: String,
    },

    /// A request to the issue tracker failed before a response was read.
    #[error("HTTP error: {message}")]
    Http {
        /// A description of the transport failure.
        message: String,
    },

    /// No API token was available for the issue tracker.
    #[error("Missing credentials: set the {variable} environment variable")]
    MissingCredentials {
        /// The environment variable that was expected to hold the token.
        variable: String,
    },

    /// The issue tracker did not accept the supplied credentials.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Status and body returned by the tracker.
        message: String,
    },

    /// An issue could not be found or is not visible to the user.
    #[error("Issue '{input}' not found: {message}")]
    IssueNotFound {
        /// The key, id or URL as supplied.
        input: String,
        /// Status and body returned by the tracker.
        message: String,
    },

    /// The issue tracker rejected a single worklog entry.
    #[error("Worklog for '{ticket_id}' on {date} rejected: {message}")]
    Submission {
        /// The ticket the entry was logged against.
        ticket_id: String,
        /// The day of the entry.
        date: NaiveDate,
        /// Status and body returned by the tracker.
        message: String,
    },

    /// A submission timestamp could not be built for a day.
    #[error("Cannot build timestamp for {date}: {message}")]
    Timestamp {
        /// The day for which the timestamp was requested.
        date: NaiveDate,
        /// A description of the failure.
        message: String,
    },
}

impl From<reqwest::Error> for EngineError {
    fn from(error: reqwest::Error) -> Self {
        EngineError::Http {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
