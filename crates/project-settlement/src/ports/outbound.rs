//! # Outbound Ports
//!
//! Traits for external collaborators: the bank ledger, the project store,
//! the fee-parameter source, and the foreign-chain bridge client.
//!
//! The bridge's verification of foreign transactions is treated as ground
//! truth; keeping it behind a trait lets the settlement logic run against a
//! mock without a real foreign-chain connection.

use crate::domain::{
    AccountMap, Dec, FeeParamKey, ForeignTransaction, ProjectDocument, SettlementError,
    InternalAccountId, WithdrawalInfo,
};
use async_trait::async_trait;
use shared_types::{AccountAddress, ActionId, Coin, Did};

/// Account/balance ledger - outbound port.
#[async_trait]
pub trait BankLedger: Send + Sync {
    /// Balance of `address` in `denom`.
    async fn get_balance(
        &self,
        address: &AccountAddress,
        denom: &str,
    ) -> Result<i64, SettlementError>;

    /// Move `coin` from one address to another.
    async fn send(
        &self,
        from: &AccountAddress,
        to: &AccountAddress,
        coin: Coin,
    ) -> Result<(), SettlementError>;

    /// Credit `coin` to `address`.
    async fn credit(&self, address: &AccountAddress, coin: Coin) -> Result<(), SettlementError>;

    /// Debit `coin` from `address`.
    async fn debit(&self, address: &AccountAddress, coin: Coin) -> Result<(), SettlementError>;
}

/// Project document and account-map keeper - outbound port.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch the project document.
    async fn get_project(&self, did: &Did) -> Result<ProjectDocument, SettlementError>;

    /// Store (or overwrite) the project document.
    async fn put_project(&self, doc: &ProjectDocument) -> Result<(), SettlementError>;

    /// The project's account map; empty when nothing is provisioned yet.
    async fn account_map(&self, did: &Did) -> AccountMap;

    /// Provision a fresh ledger account for `(did, account_id)`.
    async fn create_account(
        &self,
        did: &Did,
        account_id: &InternalAccountId,
    ) -> Result<AccountAddress, SettlementError>;

    /// Register `address` under `account_id` in the project's account map.
    async fn register_account(
        &self,
        did: &Did,
        account_id: &InternalAccountId,
        address: AccountAddress,
    );

    /// Append a withdrawal record to the project's reconciliation log.
    async fn append_withdrawal(&self, did: &Did, info: WithdrawalInfo);

    /// The project's reconciliation log, oldest first.
    async fn withdrawals(&self, did: &Did) -> Vec<WithdrawalInfo>;
}

/// Configured fee percentages and amounts - outbound port.
pub trait FeeParams: Send + Sync {
    /// The configured value for `key`.
    fn get_dec(&self, key: FeeParamKey) -> Dec;
}

/// Foreign-chain client - outbound port.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    /// The project's registered foreign wallet.
    async fn resolve_foreign_wallet(&self, did: &Did) -> Result<String, SettlementError>;

    /// Fetch a foreign transaction by id.
    async fn fetch_foreign_transaction(
        &self,
        tx_id: &str,
    ) -> Result<ForeignTransaction, SettlementError>;

    /// Whether `tx` is a legitimate funding transaction for `did`.
    fn is_funding_transaction(&self, did: &Did, tx: &ForeignTransaction) -> bool;

    /// The amount `tx` funds, in native-token units.
    fn extract_funded_amount(&self, tx: &ForeignTransaction) -> i64;

    /// Initiate a foreign transfer; returns the bridge's action identifier.
    async fn initiate_foreign_transfer(
        &self,
        from_wallet: &str,
        to_address: &str,
        amount: i64,
    ) -> Result<ActionId, SettlementError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock bridge client for testing.
#[derive(Clone, Default)]
pub struct MockBridgeClient {
    /// Registered wallet per DID.
    pub wallets: std::collections::HashMap<Did, String>,
    /// Posted foreign transactions by id.
    pub transactions: std::collections::HashMap<String, ForeignTransaction>,
    /// Should fail?
    pub should_fail: bool,
}

#[async_trait]
impl BridgeClient for MockBridgeClient {
    async fn resolve_foreign_wallet(&self, did: &Did) -> Result<String, SettlementError> {
        if self.should_fail {
            return Err(SettlementError::BridgeFailed("Mock failure".to_string()));
        }
        self.wallets
            .get(did)
            .cloned()
            .ok_or_else(|| SettlementError::BridgeFailed(format!("no foreign wallet for {did}")))
    }

    async fn fetch_foreign_transaction(
        &self,
        tx_id: &str,
    ) -> Result<ForeignTransaction, SettlementError> {
        if self.should_fail {
            return Err(SettlementError::BridgeFailed("Mock failure".to_string()));
        }
        self.transactions
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
        _from_wallet: &str,
        _to_address: &str,
        amount: i64,
    ) -> Result<ActionId, SettlementError> {
        if self.should_fail {
            return Err(SettlementError::BridgeFailed("Mock failure".to_string()));
        }
        Ok([amount as u8; 32])
    }
}
