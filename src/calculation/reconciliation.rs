//! Reconciliation of rounded allocations.
//!
//! Quantizing proportional shares to a rounding step leaves the sum off the
//! target by a few steps. The pass in this module walks the buckets in a
//! given order and moves them one step at a time until the sum matches the
//! target exactly.

use std::cmp::Reverse;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Visiting order `0, 1, .., len - 1`.
pub fn input_order(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// Visiting order by weight, heaviest first. Equal weights keep input order.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::weight_descending_order;
///
/// assert_eq!(weight_descending_order(&[1, 3, 1, 2]), vec![1, 3, 0, 2]);
/// ```
pub fn weight_descending_order(weights: &[u32]) -> Vec<usize> {
    let mut order = input_order(weights.len());
    order.sort_by_key(|&i| Reverse(weights[i]));
    order
}

/// Adjusts `values` in place until they sum to `target`.
///
/// Buckets are visited round-robin in `order`. Each visit moves the bucket
/// by `step` towards the target, or by the remaining difference when that
/// is smaller than a step. A move that would take a bucket below zero is
/// skipped whole and the cursor advances; it is never applied partially.
/// Several passes over `order` may be needed.
///
/// Values are expected on the `step` grid, as [`allocate`] produces them.
/// For grid values the target is always reached unless every visited
/// bucket is zero while the sum has to shrink. Off-grid values can fail
/// even when a smaller decrement would fit: `[5, 5]` cannot shed 10
/// minutes in steps of 15.
///
/// [`allocate`]: crate::calculation::allocate
///
/// Returns the number of adjustments applied.
///
/// # Errors
///
/// - [`EngineError::InvalidRoundStep`] when `step` is zero.
/// - [`EngineError::AllocationFailed`] when a full pass over `order` cannot
///   apply a single adjustment: every visited bucket is smaller than the
///   required decrement, or `order` is empty and the difference is
///   non-zero.
///
/// # Example
///
/// ```
/// use worklog_engine::calculation::{input_order, reconcile};
///
/// let mut minutes = vec![165, 165, 165];
/// reconcile(&mut minutes, &input_order(3), 480, 15).unwrap();
/// assert_eq!(minutes, vec![150, 165, 165]);
/// ```
pub fn reconcile(values: &mut [u32], order: &[usize], target: u32, step: u32) -> EngineResult<u32> {
    if step == 0 {
        return Err(EngineError::InvalidRoundStep { step });
    }

    let current: i64 = values.iter().map(|&v| i64::from(v)).sum();
    let mut diff = i64::from(target) - current;
    let mut adjustments = 0;
    let mut cursor = 0;
    let mut idle_visits = 0;

    while diff != 0 {
        if idle_visits >= order.len() {
            return Err(EngineError::AllocationFailed {
                total: target,
                message: format!(
                    "cannot satisfy total under current weights ({diff:+} minutes outstanding)"
                ),
            });
        }

        let idx = order[cursor % order.len()];
        cursor += 1;

        let delta = diff.signum() * diff.abs().min(i64::from(step));
        let candidate = i64::from(values[idx]) + delta;
        match u32::try_from(candidate) {
            Ok(value) => {
                values[idx] = value;
                diff -= delta;
                adjustments += 1;
                idle_visits = 0;
            }
            Err(_) => idle_visits += 1,
        }
    }

    if adjustments > 0 {
        debug!(total = target, adjustments, "reconciled rounding drift");
    }
    Ok(adjustments)
}
