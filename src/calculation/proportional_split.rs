//! Proportional split of a daily time budget.
//!
//! This module turns a daily total and a list of relative weights into
//! per-ticket minutes that are quantized to a rounding step and sum exactly
//! to the total.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

use super::reconciliation::{input_order, reconcile};

/// Minutes in a standard working day (8 hours).
pub const DEFAULT_DAILY_MINUTES: u32 = 8 * 60;

/// Default rounding granularity in minutes.
pub const DEFAULT_ROUND_STEP: u32 = 15;

/// Splits `total_minutes` across `weights`.
///
/// The result has one entry per weight and always sums to `total_minutes`.
///
/// # Behavior
///
/// - Empty `weights` yield an empty vector.
/// - When every weight is zero the total is split as evenly as possible:
///   each entry gets `total / n` and the first `total % n` entries get one
///   extra minute. No rounding step is applied in this case.
/// - Otherwise each entry's ideal share `total * weight / sum(weights)` is
///   rounded to the nearest multiple of `round_step` (ties to even), and the
///   drift left by rounding is removed by [`reconcile`] visiting entries in
///   input order.
///
/// A zero-weight entry gets nothing from rounding but may still receive a
/// step during reconciliation.
///
/// # Errors
///
/// - [`EngineError::InvalidRoundStep`] when `round_step` is zero.
/// - [`EngineError::AllocationFailed`] when reconciliation cannot reach the
///   total.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::allocate;
///
/// assert_eq!(allocate(480, &[3, 1], 15).unwrap(), vec![360, 120]);
/// assert_eq!(allocate(480, &[1, 1, 1], 15).unwrap(), vec![150, 165, 165]);
/// assert_eq!(allocate(480, &[0, 0, 0], 15).unwrap(), vec![160, 160, 160]);
/// assert!(allocate(480, &[], 15).unwrap().is_empty());
/// ```
pub fn allocate(total_minutes: u32, weights: &[u32], round_step: u32) -> EngineResult<Vec<u32>> {
    if round_step == 0 {
        return Err(EngineError::InvalidRoundStep { step: round_step });
    }
    if weights.is_empty() {
        return Ok(Vec::new());
    }

    let weight_sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if weight_sum == 0 {
        return Ok(equal_split(total_minutes, weights.len()));
    }

    let mut minutes = weights
        .iter()
        .map(|&w| quantized_share(total_minutes, w, weight_sum, round_step))
        .collect::<EngineResult<Vec<u32>>>()?;

    let order = input_order(minutes.len());
    reconcile(&mut minutes, &order, total_minutes, round_step)?;
    Ok(minutes)
}

/// Near-equal split: `total / count` each, remainder to the leading entries.
fn equal_split(total_minutes: u32, count: usize) -> Vec<u32> {
    let count = count as u64;
    let total = u64::from(total_minutes);
    let base = total / count;
    let remainder = total % count;

    (0..count)
        .map(|i| (base + u64::from(i < remainder)) as u32)
        .collect()
}

/// Ideal share of one entry, rounded to the nearest multiple of `step`.
fn quantized_share(total_minutes: u32, weight: u32, weight_sum: u64, step: u32) -> EngineResult<u32> {
    let steps = Decimal::from(total_minutes) * Decimal::from(weight)
        / (Decimal::from(weight_sum) * Decimal::from(step));
    let rounded = steps.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

    rounded
        .to_u32()
        .and_then(|units| units.checked_mul(step))
        .ok_or_else(|| EngineError::AllocationFailed {
            total: total_minutes,
            message: format!("share {} steps of {} minutes is out of range", rounded, step),
        })
}
