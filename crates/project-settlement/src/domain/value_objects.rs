//! # Domain Value Objects
//!
//! Immutable value types for the settlement engine: the project lifecycle
//! status, the closed set of internal account roles, and fee identifiers.

use serde::{Deserialize, Serialize};
use shared_types::Did;
use std::fmt;

/// Project lifecycle status.
///
/// Transitions move strictly forward through the progression table; once a
/// project is `Paidout` no further transition is legal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Project document stored, no funds yet.
    #[default]
    Created,
    /// Awaiting the foreign-chain funding transaction.
    Pending,
    /// Funding transaction verified and credited.
    Funded,
    /// Work in progress; claims and evaluations accrue fees.
    Started,
    /// Work concluded, awaiting payout.
    Stopped,
    /// Fees swept and reconciled; withdrawals are now allowed.
    Paidout,
}

impl ProjectStatus {
    /// The explicit progression table: states legally reachable from `self`.
    pub fn allowed_next(&self) -> &'static [ProjectStatus] {
        match self {
            Self::Created => &[Self::Pending],
            Self::Pending => &[Self::Funded],
            Self::Funded => &[Self::Started],
            Self::Started => &[Self::Stopped],
            Self::Stopped => &[Self::Paidout],
            Self::Paidout => &[],
        }
    }

    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Check if `self` is a valid progression from `prev`.
    pub fn is_valid_progression_from(&self, prev: ProjectStatus) -> bool {
        prev.can_transition_to(*self)
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }
}

/// Internal account roles a project's ledger addresses can serve.
///
/// A closed set: the four named fee roles plus DID-keyed accounts (the
/// project's own primary account and agent/evaluator accounts). Keeping this
/// tagged rather than stringly-typed prevents a typo from silently
/// provisioning a stray account.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InternalAccountId {
    /// Platform fee collection account.
    IxoFees,
    /// Platform share of evaluator-pay fees.
    IxoPayFees,
    /// Initiating node's share of evaluator-pay fees.
    InitiatingNodePayFees,
    /// Validating node set's share of transaction fees.
    ValidatingNodeSetFees,
    /// A DID-keyed account: the project's own primary account or an
    /// agent/evaluator account.
    Did(Did),
}

impl InternalAccountId {
    /// The project's primary account key.
    pub fn primary(project_did: &Did) -> Self {
        Self::Did(project_did.clone())
    }

    /// Storage key under which this account is registered.
    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InternalAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IxoFees => f.write_str("IxoFees"),
            Self::IxoPayFees => f.write_str("IxoPayFees"),
            Self::InitiatingNodePayFees => f.write_str("InitiatingNodePayFees"),
            Self::ValidatingNodeSetFees => f.write_str("ValidatingNodeSetFees"),
            Self::Did(did) => write!(f, "{did}"),
        }
    }
}

/// Fee-bearing transaction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeType {
    /// Fee charged when a claim is created.
    ClaimTransaction,
    /// Fee charged when an evaluation is created.
    EvaluationTransaction,
}

/// Keys into the configured fee-parameter store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeParamKey {
    /// Global multiplier applied to configured fee amounts.
    IxoFactor,
    /// Node share of a transaction fee.
    NodeFeePercentage,
    /// Base amount for claim transactions.
    ClaimFeeAmount,
    /// Base amount for evaluation transactions.
    EvaluationFeeAmount,
    /// Fee taken from an evaluator payout.
    EvaluationPayFeePercentage,
    /// Node share of the evaluator-payout fee.
    EvaluationPayNodeFeePercentage,
}
