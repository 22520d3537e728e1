//! Response types for the worklog plan API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::MissingCredentials { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::InvalidDateRange { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    message,
                    "end_date must not be before start_date",
                ),
            ),
            EngineError::InvalidRoundStep { .. } | EngineError::InvalidTimeOfDay { .. } => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
            EngineError::InvalidTicket { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_TICKET",
                    message,
                    "The ticket list contains invalid information",
                ),
            ),
            EngineError::AllocationFailed { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "ALLOCATION_FAILED",
                    message,
                    "The daily total cannot be distributed under the given weights",
                ),
            ),
            EngineError::IssueNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("ISSUE_NOT_FOUND", message),
            ),
            EngineError::Timestamp { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_TIMESTAMP", message),
            ),
            EngineError::AuthenticationFailed { .. }
            | EngineError::Http { .. }
            | EngineError::Submission { .. } => ApiErrorResponse::new(
                StatusCode::BAD_GATEWAY,
                ApiError::new("UPSTREAM_ERROR", message),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_range_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_DATE_RANGE");
    }

    #[test]
    fn test_allocation_failure_is_unprocessable() {
        let api_error: ApiErrorResponse = EngineError::AllocationFailed {
            total: 480,
            message: "cannot satisfy total under current weights".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "ALLOCATION_FAILED");
        assert!(api_error.error.message.contains("480"));
    }

    #[test]
    fn test_zero_round_step_is_validation_error() {
        let api_error: ApiErrorResponse = EngineError::InvalidRoundStep { step: 0 }.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
    }
}
