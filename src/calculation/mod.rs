//! Calculation logic for the worklog engine.
//!
//! This module contains the working day selection, the proportional split
//! of a daily budget with its reconciliation pass, per-day ticket sampling,
//! the day planner that combines them, and the duration and timestamp
//! formatting used when entries are submitted.

mod day_planner;
mod day_selection;
mod duration_format;
mod proportional_split;
mod reconciliation;
mod subset_sampler;

pub use day_planner::{AllocationSettings, plan_day, plan_range};
pub use day_selection::{DayType, get_day_type, working_days};
pub use duration_format::{
    DEFAULT_START_TIME, form_date, format_duration, parse_time_of_day, rest_started_timestamp,
    started_timestamp_in,
};
pub use proportional_split::{DEFAULT_DAILY_MINUTES, DEFAULT_ROUND_STEP, allocate};
pub use reconciliation::{input_order, reconcile, weight_descending_order};
pub use subset_sampler::{DaySelection, select_subset};
