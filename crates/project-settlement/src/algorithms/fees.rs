//! # Fee Split Computation
//!
//! Pure fixed-point fee arithmetic. Both computations round only at the
//! points where an integer transfer amount is produced, and always compute
//! the platform share as a remainder so the rounded total is conserved
//! exactly.

use crate::domain::{invariant_non_negative, Dec, SettlementError};

/// The two-way split of a transaction fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionFeeSplit {
    /// Share sent to the validating node set.
    pub node_amount: i64,
    /// Share sent to the platform fee account.
    pub platform_amount: i64,
}

impl TransactionFeeSplit {
    /// Total fee charged.
    pub fn total(&self) -> i64 {
        self.node_amount + self.platform_amount
    }
}

/// The three-way split of an evaluator payout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatorPaySplit {
    /// Amount paid to the evaluator, net of fees.
    pub payee_amount: i64,
    /// Node share of the payout fee.
    pub node_fee_amount: i64,
    /// Platform share of the payout fee.
    pub platform_fee_amount: i64,
}

impl EvaluatorPaySplit {
    /// Total amount leaving the project account.
    pub fn total(&self) -> i64 {
        self.payee_amount + self.node_fee_amount + self.platform_fee_amount
    }
}

fn mul(lhs: Dec, rhs: Dec) -> Result<Dec, SettlementError> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| SettlementError::Internal("decimal overflow in fee computation".to_string()))
}

/// Split a transaction fee between the node set and the platform.
///
/// `base = configured_amount * ixo_factor`; the node share is
/// `round(base * node_percentage)` and the platform share is the remainder
/// against `round(base)`, never rounded independently.
pub fn compute_transaction_fee(
    configured_amount: Dec,
    ixo_factor: Dec,
    node_percentage: Dec,
) -> Result<TransactionFeeSplit, SettlementError> {
    let base = mul(configured_amount, ixo_factor)?;
    let node_amount = mul(base, node_percentage)?.round_to_i64()?;
    let platform_amount = base.round_to_i64()? - node_amount;
    invariant_non_negative(platform_amount, "platform fee")?;

    Ok(TransactionFeeSplit {
        node_amount,
        platform_amount,
    })
}

/// Split an evaluator payout into payee, node-fee, and platform-fee legs.
///
/// `total = evaluator_pay * token_factor`; the fee is held at full precision,
/// the payee amount is the exact pre-rounding subtraction `total - fee`
/// rounded once, and the platform fee is the remainder against `round(fee)`.
pub fn compute_evaluator_split(
    evaluator_pay: i64,
    token_factor: Dec,
    fee_percentage: Dec,
    node_fee_percentage: Dec,
) -> Result<EvaluatorPaySplit, SettlementError> {
    invariant_non_negative(evaluator_pay, "evaluator pay")?;

    let total = mul(Dec::from_int(evaluator_pay)?, token_factor)?;
    let fee = mul(total, fee_percentage)?;
    let payee_amount = total
        .checked_sub(fee)
        .ok_or_else(|| {
            SettlementError::InvalidInput("payout fee exceeds evaluator pay".to_string())
        })?
        .round_to_i64()?;
    let node_fee_amount = mul(fee, node_fee_percentage)?.round_to_i64()?;
    let platform_fee_amount = fee.round_to_i64()? - node_fee_amount;
    invariant_non_negative(platform_fee_amount, "platform payout fee")?;

    Ok(EvaluatorPaySplit {
        payee_amount,
        node_fee_amount,
        platform_fee_amount,
    })
}
