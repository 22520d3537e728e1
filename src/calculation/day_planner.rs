//! Day planning.
//!
//! This module ties the calendar selector, the subset sampler and the
//! allocator together. For every working day in a period it picks the
//! tickets for the day, splits the daily budget across them, runs a second
//! reconciliation ordered by weight and drops entries that ended up empty.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationPlan, DayPlan, PlanTotals, Ticket, WorkPeriod, WorklogEntry};

use super::day_selection::working_days;
use super::proportional_split::{DEFAULT_DAILY_MINUTES, DEFAULT_ROUND_STEP, allocate};
use super::reconciliation::{reconcile, weight_descending_order};
use super::subset_sampler::{DaySelection, select_subset};

/// Settings that control how a period is allocated.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::AllocationSettings;
///
/// let settings = AllocationSettings::default();
/// assert_eq!(settings.daily_minutes, 480);
/// assert_eq!(settings.round_step, 15);
/// assert!(settings.skip_weekends && settings.skip_holidays);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSettings {
    /// Minutes to log on every working day.
    #[serde(default = "default_daily_minutes")]
    pub daily_minutes: u32,
    /// Rounding granularity in minutes.
    #[serde(default = "default_round_step")]
    pub round_step: u32,
    /// Leave Saturdays and Sundays out.
    #[serde(default = "default_true")]
    pub skip_weekends: bool,
    /// Leave public holidays out.
    #[serde(default = "default_true")]
    pub skip_holidays: bool,
    /// Per-day ticket selection.
    #[serde(default)]
    pub selection: DaySelection,
}

fn default_daily_minutes() -> u32 {
    DEFAULT_DAILY_MINUTES
}

fn default_round_step() -> u32 {
    DEFAULT_ROUND_STEP
}

fn default_true() -> bool {
    true
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            daily_minutes: DEFAULT_DAILY_MINUTES,
            round_step: DEFAULT_ROUND_STEP,
            skip_weekends: true,
            skip_holidays: true,
            selection: DaySelection::default(),
        }
    }
}

/// Plans the entries for a single working day.
///
/// `tracked` must already be filtered to tracked tickets. When the sampled
/// subset carries only zero weights, every ticket in it is given a weight
/// of one so that the split stays on the rounding grid. Entries that end
/// up with zero minutes are left out of the returned plan.
///
/// # Errors
///
/// Propagates [`EngineError::InvalidRoundStep`] and
/// [`EngineError::AllocationFailed`] from the allocator.
pub fn plan_day<R>(
    date: NaiveDate,
    tracked: &[Ticket],
    settings: &AllocationSettings,
    rng: &mut R,
) -> EngineResult<DayPlan>
where
    R: Rng + ?Sized,
{
    let subset = select_subset(tracked, &settings.selection, rng);
    if subset.is_empty() {
        return Ok(DayPlan {
            date,
            entries: Vec::new(),
        });
    }

    let mut weights: Vec<u32> = subset.iter().map(|t| t.weight).collect();
    if weights.iter().all(|&w| w == 0) {
        weights.fill(1);
    }

    let mut minutes = allocate(settings.daily_minutes, &weights, settings.round_step)?;
    reconcile(
        &mut minutes,
        &weight_descending_order(&weights),
        settings.daily_minutes,
        settings.round_step,
    )?;

    let entries: Vec<WorklogEntry> = subset
        .iter()
        .zip(minutes)
        .filter(|(_, minutes)| *minutes > 0)
        .map(|(ticket, minutes)| WorklogEntry {
            ticket_id: ticket.id.clone(),
            label: ticket.label.clone(),
            date,
            minutes,
        })
        .collect();

    debug!(
        date = %date,
        subset = subset.len(),
        entries = entries.len(),
        "planned day"
    );

    Ok(DayPlan { date, entries })
}

/// Plans every working day of `period`.
///
/// Untracked tickets are ignored. Holidays are taken from the period, and
/// each working day is planned independently with [`plan_day`], drawing
/// from the same random source in date order.
///
/// # Errors
///
/// - [`EngineError::InvalidDateRange`] when the period ends before it starts.
/// - [`EngineError::InvalidTicket`] when a tracked ticket has a blank id.
/// - Any error from [`plan_day`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use worklog_engine::calculation::{AllocationSettings, plan_range};
/// use worklog_engine::models::{Ticket, WorkPeriod};
///
/// let period = WorkPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
/// );
/// let tickets = vec![Ticket::new("A-1", 3), Ticket::new("B-2", 1)];
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let plan = plan_range(&period, &tickets, &AllocationSettings::default(), &mut rng).unwrap();
/// assert_eq!(plan.days.len(), 2);
/// assert_eq!(plan.totals.total_minutes, 960);
/// ```
pub fn plan_range<R>(
    period: &WorkPeriod,
    tickets: &[Ticket],
    settings: &AllocationSettings,
    rng: &mut R,
) -> EngineResult<AllocationPlan>
where
    R: Rng + ?Sized,
{
    period.validate()?;

    let tracked: Vec<Ticket> = tickets.iter().filter(|t| t.tracked).cloned().collect();
    if let Some(blank) = tracked.iter().find(|t| t.id.trim().is_empty()) {
        return Err(EngineError::InvalidTicket {
            id: blank.id.clone(),
            message: "ticket id must not be empty".to_string(),
        });
    }

    let days = working_days(
        period.start_date,
        period.end_date,
        settings.skip_weekends,
        settings.skip_holidays,
        &period.holiday_dates(),
    );

    let day_plans = days
        .into_iter()
        .map(|date| plan_day(date, &tracked, settings, rng))
        .collect::<EngineResult<Vec<DayPlan>>>()?;

    let totals = PlanTotals::from_days(&day_plans);
    info!(
        start = %period.start_date,
        end = %period.end_date,
        tickets = tracked.len(),
        working_days = totals.working_days,
        entries = totals.entries,
        total_minutes = totals.total_minutes,
        "allocation planned"
    );

    Ok(AllocationPlan {
        plan_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        period: period.clone(),
        days: day_plans,
        totals,
    })
}
