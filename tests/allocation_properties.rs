//! Property tests for the allocation core.

use chrono::NaiveDate;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use worklog_engine::calculation::{
    AllocationSettings, DaySelection, allocate, input_order, plan_day, reconcile,
};
use worklog_engine::models::Ticket;

fn weights() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..=10, 1..8)
}

proptest! {
    #[test]
    fn allocation_always_meets_the_total(
        total in 0u32..=1440,
        weights in weights(),
        step in 1u32..=60,
    ) {
        let minutes = allocate(total, &weights, step).unwrap();
        prop_assert_eq!(minutes.len(), weights.len());
        prop_assert_eq!(minutes.iter().sum::<u32>(), total);
    }

    #[test]
    fn weighted_shares_stay_on_the_grid_when_the_total_does(
        units in 0u32..=96,
        weights in weights(),
        step in prop::sample::select(vec![5u32, 10, 15, 30, 60]),
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0));
        let total = units * step;
        let minutes = allocate(total, &weights, step).unwrap();
        prop_assert!(minutes.iter().all(|m| m % step == 0), "{:?} off a {} grid", minutes, step);
    }

    #[test]
    fn equal_split_differs_by_at_most_one_minute(
        total in 0u32..=1440,
        count in 1usize..10,
    ) {
        let minutes = allocate(total, &vec![0; count], 15).unwrap();
        let max = *minutes.iter().max().unwrap();
        let min = *minutes.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        prop_assert_eq!(minutes.iter().sum::<u32>(), total);
    }

    #[test]
    fn reconcile_reaches_the_target_from_grid_values(
        units in prop::collection::vec(0u32..=40, 1..6),
        target in 0u32..=1440,
        step in 1u32..=60,
    ) {
        let mut values: Vec<u32> = units.iter().map(|u| u * step).collect();
        let order = input_order(values.len());
        reconcile(&mut values, &order, target, step).unwrap();
        prop_assert_eq!(values.iter().sum::<u32>(), target);
    }

    #[test]
    fn planned_day_meets_the_budget_for_any_subset(
        weights in weights(),
        k in 1usize..10,
        seed in any::<u64>(),
    ) {
        let tickets: Vec<Ticket> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Ticket::new(format!("T-{i}"), w))
            .collect();
        let settings = AllocationSettings {
            selection: DaySelection::random(k),
            ..AllocationSettings::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        let day = plan_day(date, &tickets, &settings, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(day.total_minutes(), 480);
        prop_assert!(day.entries.len() <= k.min(tickets.len()));
        prop_assert!(day.entries.iter().all(|e| e.minutes > 0 && e.minutes % 15 == 0));
    }

    #[test]
    fn planned_day_meets_any_budget_and_step(
        weights in weights(),
        daily_minutes in 0u32..=1440,
        round_step in 1u32..=60,
        k in 1usize..10,
        seed in any::<u64>(),
    ) {
        let tickets: Vec<Ticket> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Ticket::new(format!("T-{i}"), w))
            .collect();
        let settings = AllocationSettings {
            daily_minutes,
            round_step,
            selection: DaySelection::random(k),
            ..AllocationSettings::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        let day = plan_day(date, &tickets, &settings, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(day.total_minutes(), daily_minutes);
        prop_assert!(day.entries.iter().all(|e| e.minutes > 0));
        let off_grid = day.entries.iter().filter(|e| e.minutes % round_step != 0).count();
        prop_assert!(off_grid <= 1, "{} entries off a {} grid", off_grid, round_step);
    }
}
