//! HTTP request handlers for the worklog plan API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::plan_range;
use crate::error::EngineResult;
use crate::models::{AllocationPlan, PublicHoliday, WorkPeriod};

use super::request::PlanRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/plan", post(plan_handler))
        .with_state(state)
}

/// Handler for POST /plan endpoint.
///
/// Accepts a plan request and returns the allocation plan. Nothing is
/// submitted to the tracker.
async fn plan_handler(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing plan request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let start_time = Instant::now();
    match build_plan(&state, &request) {
        Ok(plan) => {
            info!(
                correlation_id = %correlation_id,
                plan_id = %plan.plan_id,
                working_days = plan.totals.working_days,
                entries = plan.totals.entries,
                duration_us = start_time.elapsed().as_micros(),
                "Plan completed successfully"
            );
            json_response(StatusCode::OK, plan)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Plan failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Resolves the request against the configuration and plans the period.
fn build_plan(state: &AppState, request: &PlanRequest) -> EngineResult<AllocationPlan> {
    let config = state.config();
    let settings = request.settings(config.allocation());
    let tickets = request.tickets_or(config.tickets());

    let period = match &request.public_holidays {
        Some(holidays) => {
            let holidays: Vec<PublicHoliday> = holidays.iter().cloned().map(Into::into).collect();
            WorkPeriod::new(request.start_date, request.end_date).with_holidays(&holidays)
        }
        None => config.period(request.start_date, request.end_date),
    };

    let mut rng = state.rng_for(request.seed);
    plan_range(&period, &tickets, &settings, &mut rng)
}
