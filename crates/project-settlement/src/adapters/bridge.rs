//! Simulated Bridge Adapter
//!
//! Implements the `BridgeClient` port against process-local state. In
//! production this would speak to the bridge/oracle service watching the
//! foreign chain; here wallets and transactions are registered up front and
//! initiated transfers are recorded for inspection.

use crate::domain::{ForeignTransaction, SettlementError};
use crate::ports::outbound::BridgeClient;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use shared_types::{ActionId, Did};
use std::collections::HashMap;
use tracing::{debug, info};

/// A foreign transfer the simulated bridge has initiated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiatedTransfer {
    /// Bridge-assigned action identifier.
    pub action_id: ActionId,
    /// Source foreign wallet.
    pub from_wallet: String,
    /// Recipient foreign address.
    pub to_address: String,
    /// Amount transferred.
    pub amount: i64,
}

/// Simulated foreign-chain bridge client.
#[derive(Default)]
pub struct SimulatedBridgeClient {
    wallets: RwLock<HashMap<Did, String>>,
    transactions: RwLock<HashMap<String, ForeignTransaction>>,
    transfers: RwLock<Vec<InitiatedTransfer>>,
    fail_transfers: RwLock<bool>,
}

impl SimulatedBridgeClient {
    /// Create a bridge with no registered state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project's foreign wallet.
    pub fn register_wallet(&self, did: Did, wallet: impl Into<String>) {
        self.wallets.write().insert(did, wallet.into());
    }

    /// Post a foreign transaction the bridge can later fetch.
    pub fn post_transaction(&self, tx: ForeignTransaction) {
        self.transactions.write().insert(tx.tx_id.clone(), tx);
    }

    /// Make subsequent transfer initiations fail (or succeed again).
    pub fn set_fail_transfers(&self, fail: bool) {
        *self.fail_transfers.write() = fail;
    }

    /// Transfers initiated so far, oldest first.
    pub fn initiated_transfers(&self) -> Vec<InitiatedTransfer> {
        self.transfers.read().clone()
    }

    fn derive_action_id(from_wallet: &str, to_address: &str, amount: i64, nonce: usize) -> ActionId {
        let mut hasher = Sha256::new();
        hasher.update(from_wallet.as_bytes());
        hasher.update(to_address.as_bytes());
        hasher.update(amount.to_le_bytes());
        hasher.update((nonce as u64).to_le_bytes());

        let digest = hasher.finalize();
        let mut id = [0u8; 32];
        id.copy_from_slice(&digest);
        id
    }
}

#[async_trait]
impl BridgeClient for SimulatedBridgeClient {
    async fn resolve_foreign_wallet(&self, did: &Did) -> Result<String, SettlementError> {
        self.wallets
            .read()
            .get(did)
            .cloned()
            .ok_or_else(|| SettlementError::BridgeFailed(format!("no foreign wallet for {did}")))
    }

    async fn fetch_foreign_transaction(
        &self,
        tx_id: &str,
    ) -> Result<ForeignTransaction, SettlementError> {
        debug!("[settlement] fetching foreign transaction {tx_id}");
        self.transactions
            .read()
            .get(tx_id)
            .cloned()
            .ok_or_else(|| SettlementError::BridgeFailed(format!("unknown transaction {tx_id}")))
    }

    fn is_funding_transaction(&self, did: &Did, tx: &ForeignTransaction) -> bool {
        tx.project_did == *did && tx.amount > 0
    }

    fn extract_funded_amount(&self, tx: &ForeignTransaction) -> i64 {
        tx.amount
    }

    async fn initiate_foreign_transfer(
        &self,
        from_wallet: &str,
        to_address: &str,
        amount: i64,
    ) -> Result<ActionId, SettlementError> {
        if *self.fail_transfers.read() {
            return Err(SettlementError::BridgeFailed(
                "foreign chain unavailable".to_string(),
            ));
        }

        let mut transfers = self.transfers.write();
        let action_id = Self::derive_action_id(from_wallet, to_address, amount, transfers.len());
        transfers.push(InitiatedTransfer {
            action_id,
            from_wallet: from_wallet.to_string(),
            to_address: to_address.to_string(),
            amount,
        });
        info!("[settlement] initiated foreign transfer of {amount} from {from_wallet} to {to_address}");
        Ok(action_id)
    }
}
