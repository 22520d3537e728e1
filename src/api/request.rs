//! Request types for the worklog plan API.
//!
//! This module defines the JSON request structures for the `/plan` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{AllocationSettings, DaySelection};
use crate::models::{PublicHoliday, Ticket};

/// Request body for the `/plan` endpoint.
///
/// Only the date range is required. Every other field overrides the
/// server's configuration when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// First day of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive).
    pub end_date: NaiveDate,
    /// Tickets to allocate across, in order.
    #[serde(default)]
    pub tickets: Option<Vec<TicketRequest>>,
    /// Holidays to use instead of the configured calendar.
    #[serde(default)]
    pub public_holidays: Option<Vec<PublicHolidayRequest>>,
    /// Minutes per working day.
    #[serde(default)]
    pub daily_minutes: Option<u32>,
    /// Rounding granularity in minutes.
    #[serde(default)]
    pub round_step: Option<u32>,
    /// Leave weekends out.
    #[serde(default)]
    pub skip_weekends: Option<bool>,
    /// Leave public holidays out.
    #[serde(default)]
    pub skip_holidays: Option<bool>,
    /// Draw a random ticket subset per day.
    #[serde(default)]
    pub randomize: Option<bool>,
    /// Subset size when randomizing.
    #[serde(default)]
    pub k: Option<usize>,
    /// Seed for reproducible subsets.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PlanRequest {
    /// Applies the request's overrides on top of `base`.
    pub fn settings(&self, base: &AllocationSettings) -> AllocationSettings {
        AllocationSettings {
            daily_minutes: self.daily_minutes.unwrap_or(base.daily_minutes),
            round_step: self.round_step.unwrap_or(base.round_step),
            skip_weekends: self.skip_weekends.unwrap_or(base.skip_weekends),
            skip_holidays: self.skip_holidays.unwrap_or(base.skip_holidays),
            selection: DaySelection {
                randomize: self.randomize.unwrap_or(base.selection.randomize),
                k: self.k.unwrap_or(base.selection.k),
            },
        }
    }

    /// The request's tickets, or `configured` when none were sent.
    pub fn tickets_or(&self, configured: &[Ticket]) -> Vec<Ticket> {
        match &self.tickets {
            Some(tickets) => tickets.iter().cloned().map(Into::into).collect(),
            None => configured.to_vec(),
        }
    }
}

/// Ticket information in a plan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Issue key or id.
    pub id: String,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
    /// Relative weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Whether the ticket takes part in allocation.
    #[serde(default = "default_tracked")]
    pub tracked: bool,
}

fn default_weight() -> u32 {
    1
}

fn default_tracked() -> bool {
    true
}

impl From<TicketRequest> for Ticket {
    fn from(req: TicketRequest) -> Self {
        Ticket {
            id: req.id,
            label: req.label,
            weight: req.weight,
            tracked: req.tracked,
        }
    }
}

/// Public holiday information in a plan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHolidayRequest {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    pub name: String,
    /// The region where this holiday applies.
    #[serde(default)]
    pub region: String,
}

impl From<PublicHolidayRequest> for PublicHoliday {
    fn from(req: PublicHolidayRequest) -> Self {
        PublicHoliday {
            date: req.date,
            name: req.name,
            region: req.region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PlanRequest {
        serde_json::from_str(r#"{"start_date": "2025-01-01", "end_date": "2025-01-07"}"#).unwrap()
    }

    #[test]
    fn test_minimal_request_falls_back_to_configuration() {
        let request = minimal();
        let base = AllocationSettings::default();
        assert_eq!(request.settings(&base), base);

        let configured = vec![Ticket::new("SINT-1", 2)];
        assert_eq!(request.tickets_or(&configured), configured);
    }

    #[test]
    fn test_overrides_are_applied() {
        let request: PlanRequest = serde_json::from_str(
            r#"{
                "start_date": "2025-01-01",
                "end_date": "2025-01-07",
                "round_step": 30,
                "skip_weekends": false,
                "randomize": true,
                "k": 3,
                "tickets": [{"id": "A-1", "weight": 3}, {"id": "B-2", "tracked": false}]
            }"#,
        )
        .unwrap();

        let settings = request.settings(&AllocationSettings::default());
        assert_eq!(settings.round_step, 30);
        assert_eq!(settings.daily_minutes, 480);
        assert!(!settings.skip_weekends);
        assert!(settings.skip_holidays);
        assert_eq!(settings.selection, DaySelection::random(3));

        let tickets = request.tickets_or(&[]);
        assert_eq!(tickets[0], Ticket::new("A-1", 3));
        assert_eq!(tickets[1], Ticket::new("B-2", 1).tracked(false));
    }

    #[test]
    fn test_holiday_request_conversion() {
        let holiday: PublicHoliday = PublicHolidayRequest {
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            name: "Epiphany".to_string(),
            region: "SK".to_string(),
        }
        .into();
        assert_eq!(holiday.name, "Epiphany");
        assert_eq!(holiday.region, "SK");
    }
}
