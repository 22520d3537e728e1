//! HTTP API module for the worklog engine.
//!
//! This module provides a plan preview endpoint: it returns the allocation
//! for a date range without submitting anything to the tracker.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PlanRequest, PublicHolidayRequest, TicketRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
