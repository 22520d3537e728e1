//! Ticket model.
//!
//! A ticket is one issue the user logs time against, together with its
//! relative weight and whether it currently takes part in allocation.

use serde::{Deserialize, Serialize};

/// A weighted ticket that daily minutes are distributed across.
///
/// # Example
///
/// ```
/// use worklog_engine::models::Ticket;
///
/// let ticket = Ticket::new("SINT-1234", 3);
/// assert!(ticket.tracked);
/// assert_eq!(ticket.display_name(), "SINT-1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Issue key or numeric id as understood by the tracker.
    pub id: String,
    /// Optional human-readable label (usually the issue summary).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Relative share of the daily time. Zero is allowed.
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

impl Ticket {
    /// Creates a tracked ticket without a label.
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            label: None,
            weight,
            tracked: true,
        }
    }

    /// Sets the label, builder style.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the tracked flag, builder style.
    pub fn tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Returns the label when present and non-empty, otherwise the id.
    pub fn display_name(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.id,
        }
    }
}
