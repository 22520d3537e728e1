//! Core data models for the worklog engine.
//!
//! This module contains the domain models shared by the allocation core,
//! the submission back ends and the plan API.

mod plan;
mod ticket;
mod work_period;

pub use plan::{
    AllocationPlan, DayPlan, PlanTotals, SubmissionFailure, SubmissionReport, WorklogEntry,
};
pub use ticket::Ticket;
pub use work_period::{
    PublicHoliday, WorkPeriod, first_day_of_month, last_day_of_month, start_of_week,
};
