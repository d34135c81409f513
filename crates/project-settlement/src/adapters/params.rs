//! Fee-Parameter Adapter
//!
//! Implements the `FeeParams` port from an explicit set of configured
//! values, the way a genesis file would populate the on-chain parameter
//! store.

use crate::domain::{Dec, FeeParamKey};
use crate::ports::outbound::FeeParams;

/// Fee parameters held as plain configured values.
#[derive(Clone, Debug)]
pub struct ConfiguredFeeParams {
    /// Global multiplier applied to configured fee amounts.
    pub ixo_factor: Dec,
    /// Node share of a transaction fee.
    pub node_fee_percentage: Dec,
    /// Base amount for claim transactions.
    pub claim_fee_amount: Dec,
    /// Base amount for evaluation transactions.
    pub evaluation_fee_amount: Dec,
    /// Fee taken from an evaluator payout.
    pub evaluation_pay_fee_percentage: Dec,
    /// Node share of the evaluator-payout fee.
    pub evaluation_pay_node_fee_percentage: Dec,
}

impl Default for ConfiguredFeeParams {
    fn default() -> Self {
        Self {
            ixo_factor: Dec::one(),
            node_fee_percentage: Dec::percent(50),
            claim_fee_amount: Dec::from_uint(600_000),
            evaluation_fee_amount: Dec::from_uint(400_000),
            evaluation_pay_fee_percentage: Dec::percent(10),
            evaluation_pay_node_fee_percentage: Dec::percent(50),
        }
    }
}

impl ConfiguredFeeParams {
    /// Override the claim fee amount.
    pub fn with_claim_fee(mut self, amount: Dec) -> Self {
        self.claim_fee_amount = amount;
        self
    }

    /// Override the evaluation fee amount.
    pub fn with_evaluation_fee(mut self, amount: Dec) -> Self {
        self.evaluation_fee_amount = amount;
        self
    }

    /// Override the global fee multiplier.
    pub fn with_ixo_factor(mut self, factor: Dec) -> Self {
        self.ixo_factor = factor;
        self
    }

    /// Override the node share of transaction fees.
    pub fn with_node_fee_percentage(mut self, percentage: Dec) -> Self {
        self.node_fee_percentage = percentage;
        self
    }

    /// Override the evaluator-payout fee percentage.
    pub fn with_evaluation_pay_fee_percentage(mut self, percentage: Dec) -> Self {
        self.evaluation_pay_fee_percentage = percentage;
        self
    }

    /// Override the node share of the evaluator-payout fee.
    pub fn with_evaluation_pay_node_fee_percentage(mut self, percentage: Dec) -> Self {
        self.evaluation_pay_node_fee_percentage = percentage;
        self
    }
}

impl FeeParams for ConfiguredFeeParams {
    fn get_dec(&self, key: FeeParamKey) -> Dec {
        match key {
            FeeParamKey::IxoFactor => self.ixo_factor,
            FeeParamKey::NodeFeePercentage => self.node_fee_percentage,
            FeeParamKey::ClaimFeeAmount => self.claim_fee_amount,
            FeeParamKey::EvaluationFeeAmount => self.evaluation_fee_amount,
            FeeParamKey::EvaluationPayFeePercentage => self.evaluation_pay_fee_percentage,
            FeeParamKey::EvaluationPayNodeFeePercentage => {
                self.evaluation_pay_node_fee_percentage
            }
        }
    }
}
