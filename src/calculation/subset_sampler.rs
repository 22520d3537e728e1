//! Per-day ticket subset selection.
//!
//! When randomization is enabled, each working day only logs time against
//! a random handful of the tracked tickets. The random source is always
//! passed in by the caller so that runs can be reproduced from a seed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::Ticket;

/// How many tickets to pick for each working day.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::DaySelection;
///
/// let selection = DaySelection::random(2);
/// assert!(selection.randomize);
/// assert_eq!(DaySelection::default().k, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySelection {
    /// Draw a random subset per day instead of using every tracked ticket.
    #[serde(default)]
    pub randomize: bool,
    /// Subset size; clamped to `1..=tracked.len()` at selection time.
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    1
}

impl Default for DaySelection {
    fn default() -> Self {
        Self {
            randomize: false,
            k: default_k(),
        }
    }
}

impl DaySelection {
    /// Every tracked ticket, every day.
    pub fn all() -> Self {
        Self::default()
    }

    /// A random subset of `k` tickets per day.
    pub fn random(k: usize) -> Self {
        Self { randomize: true, k }
    }
}

/// Picks the tickets that get time on one day.
///
/// Without randomization, or with at most one tracked ticket, the full list
/// is returned in stored order. Otherwise `k` (clamped to
/// `1..=tracked.len()`) distinct tickets are drawn uniformly at random
/// without replacement. Every call draws independently of earlier calls.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use worklog_engine::calculation::{DaySelection, select_subset};
/// use worklog_engine::models::Ticket;
///
/// let tickets: Vec<Ticket> = (1..=5).map(|i| Ticket::new(format!("T-{i}"), 1)).collect();
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let subset = select_subset(&tickets, &DaySelection::random(2), &mut rng);
/// assert_eq!(subset.len(), 2);
/// assert_ne!(subset[0].id, subset[1].id);
/// ```
pub fn select_subset<'a, R>(
    tracked: &'a [Ticket],
    selection: &DaySelection,
    rng: &mut R,
) -> Vec<&'a Ticket>
where
    R: Rng + ?Sized,
{
    if !selection.randomize || tracked.len() <= 1 {
        return tracked.iter().collect();
    }

    let k = selection.k.clamp(1, tracked.len());
    tracked.choose_multiple(rng, k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn tickets(n: usize) -> Vec<Ticket> {
        (1..=n).map(|i| Ticket::new(format!("T-{i}"), 1)).collect()
    }

    fn ids(subset: &[&Ticket]) -> Vec<String> {
        subset.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_disabled_returns_full_list_in_order() {
        let tracked = tickets(4);
        let mut rng = StdRng::seed_from_u64(1);
        let subset = select_subset(&tracked, &DaySelection::all(), &mut rng);
        assert_eq!(ids(&subset), vec!["T-1", "T-2", "T-3", "T-4"]);
    }

    #[test]
    fn test_single_ticket_ignores_randomization() {
        let tracked = tickets(1);
        let mut rng = StdRng::seed_from_u64(1);
        let subset = select_subset(&tracked, &DaySelection::random(3), &mut rng);
        assert_eq!(ids(&subset), vec!["T-1"]);
    }

    #[test]
    fn test_empty_list_yields_empty_subset() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_subset(&[], &DaySelection::random(2), &mut rng).is_empty());
    }

    #[test]
    fn test_k_is_clamped_to_list_length() {
        let tracked = tickets(3);
        let mut rng = StdRng::seed_from_u64(2);
        let subset = select_subset(&tracked, &DaySelection::random(10), &mut rng);
        let unique: HashSet<String> = ids(&subset).into_iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_k_of_zero_is_clamped_to_one() {
        let tracked = tickets(3);
        let mut rng = StdRng::seed_from_u64(3);
        let subset = select_subset(&tracked, &DaySelection::random(0), &mut rng);
        assert_eq!(subset.len(), 1);
    }

    #[test]
    fn test_draws_are_distinct_and_from_the_list() {
        let tracked = tickets(5);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let subset = select_subset(&tracked, &DaySelection::random(2), &mut rng);
            assert_eq!(subset.len(), 2);
            assert_ne!(subset[0].id, subset[1].id);
            assert!(subset.iter().all(|t| tracked.contains(t)));
        }
    }

    #[test]
    fn test_selection_frequency_is_roughly_uniform() {
        let tracked = tickets(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, u32> = HashMap::new();
        let draws = 5_000;

        for _ in 0..draws {
            for ticket in select_subset(&tracked, &DaySelection::random(2), &mut rng) {
                *counts.entry(ticket.id.clone()).or_default() += 1;
            }
        }

        // Each ticket is expected 2000 times (2 of 5 per draw).
        for ticket in &tracked {
            let count = counts.get(&ticket.id).copied().unwrap_or(0);
            assert!(
                (1_800..=2_200).contains(&count),
                "{} selected {} times",
                ticket.id,
                count
            );
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_same_draws() {
        let tracked = tickets(6);
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            let a = ids(&select_subset(&tracked, &DaySelection::random(3), &mut first));
            let b = ids(&select_subset(&tracked, &DaySelection::random(3), &mut second));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_day_selection_deserializes_with_defaults() {
        let selection: DaySelection = serde_yaml::from_str("randomize: true\n").unwrap();
        assert_eq!(selection, DaySelection::random(1));
    }
}
