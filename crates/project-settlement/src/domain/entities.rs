//! # Domain Entities
//!
//! Core entities for the settlement engine: the project document, the
//! per-project account map, the withdrawal audit record, and the engine
//! configuration.

use super::value_objects::{InternalAccountId, ProjectStatus};
use crate::domain::decimal::Dec;
use serde::{Deserialize, Serialize};
use shared_types::{AccountAddress, Did, ForeignTxId, NATIVE_TOKEN};
use std::collections::BTreeMap;

/// The project document.
///
/// Owned exclusively by the project store; the engine reads a copy, mutates
/// fields, and writes it back. No concurrent holders exist within one
/// operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// The project's identifier.
    pub project_did: Did,
    /// Current lifecycle status.
    pub status: ProjectStatus,
    /// Evaluator payout per evaluation, in token units before decimal
    /// expansion. Zero disables evaluator payouts.
    pub evaluator_pay: i64,
}

impl ProjectDocument {
    /// Create a new document in `Created` status.
    pub fn new(project_did: Did, evaluator_pay: i64) -> Self {
        Self {
            project_did,
            status: ProjectStatus::Created,
            evaluator_pay,
        }
    }
}

/// An append-only record of one cross-chain withdrawal.
///
/// Created once per successful foreign transfer, never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalInfo {
    /// Bridge-assigned action identifier, `0x`-prefixed hex.
    pub action_id: String,
    /// The project's foreign wallet the transfer was initiated from.
    pub source_foreign_wallet: String,
    /// Recipient address on the foreign chain.
    pub recipient_foreign_address: String,
    /// Amount withdrawn, in native-token units.
    pub amount: i64,
}

/// The bridge's view of a foreign funding transaction.
///
/// Opaque to the engine beyond these fields; verification internals belong
/// to the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignTransaction {
    /// Foreign-chain transaction identifier.
    pub tx_id: ForeignTxId,
    /// Project the transaction funds.
    pub project_did: Did,
    /// Funded amount in native-token units.
    pub amount: i64,
}

/// Per-project mapping from account role to ledger address.
///
/// Lazily populated: absence means "not yet provisioned", not an error.
/// Once an id is mapped the address never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMap(BTreeMap<InternalAccountId, AccountAddress>);

impl AccountMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the address registered under `id`.
    pub fn get(&self, id: &InternalAccountId) -> Option<AccountAddress> {
        self.0.get(id).copied()
    }

    /// True when `id` has been provisioned.
    pub fn contains(&self, id: &InternalAccountId) -> bool {
        self.0.contains_key(id)
    }

    /// Register `address` under `id`.
    pub fn insert(&mut self, id: InternalAccountId, address: AccountAddress) {
        self.0.insert(id, address);
    }

    /// Iterate over registered accounts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&InternalAccountId, &AccountAddress)> {
        self.0.iter()
    }

    /// Number of provisioned accounts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing has been provisioned yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Settlement engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Denomination of every internal transfer.
    pub denom: String,
    /// Decimal expansion exponent applied to token-scale evaluator pay
    /// before splitting (amounts become `pay * 10^token_decimal_places`).
    pub token_decimal_places: u32,
    /// The platform's registered foreign wallet, recipient of swept fees.
    pub platform_foreign_wallet: String,
}

impl SettlementConfig {
    /// The decimal expansion factor as a fixed-point value.
    pub fn token_factor(&self) -> Dec {
        Dec::from_uint(10u64.pow(self.token_decimal_places))
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            denom: NATIVE_TOKEN.to_string(),
            token_decimal_places: 8,
            platform_foreign_wallet: "0x2aCe7055f0Ca9da27a0B4eC5a0Eb9Bb7cB8Cf1A4".to_string(),
        }
    }
}
