//! # Domain Invariants
//!
//! Business rules for the settlement engine.

use super::errors::SettlementError;
use super::value_objects::ProjectStatus;

/// Invariant: status progression follows the table.
///
/// Checked before any financial side effect; an illegal request aborts with
/// no mutation.
pub fn invariant_valid_progression(
    current: ProjectStatus,
    requested: ProjectStatus,
) -> Result<(), SettlementError> {
    if !requested.is_valid_progression_from(current) {
        return Err(SettlementError::InvalidTransition {
            from: current,
            to: requested,
        });
    }
    Ok(())
}

/// Invariant: amounts entering a transfer are non-negative.
///
/// A negative computed amount is a defect upstream, never a valid state.
pub fn invariant_non_negative(amount: i64, what: &str) -> Result<(), SettlementError> {
    if amount < 0 {
        return Err(SettlementError::InvalidInput(format!(
            "negative {what}: {amount}"
        )));
    }
    Ok(())
}

/// Invariant: a fee split conserves the rounded total.
///
/// No amount may be lost to independent rounding of the parts.
pub fn invariant_split_conserved(parts: &[i64], total: i64) -> bool {
    parts.iter().sum::<i64>() == total
}
