//! In-Memory Project Store Adapter
//!
//! Implements the `ProjectStore` port against process-local maps. Account
//! addresses are derived deterministically from the `(project, account)`
//! pair, so re-provisioning the same pair can never mint a second address.

use crate::domain::{AccountMap, InternalAccountId, ProjectDocument, SettlementError, WithdrawalInfo};
use crate::ports::outbound::ProjectStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use shared_types::{AccountAddress, Did};
use std::collections::HashMap;
use tracing::debug;

/// In-memory keeper for project documents, account maps, and withdrawal logs.
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<Did, ProjectDocument>>,
    accounts: RwLock<HashMap<Did, AccountMap>>,
    withdrawals: RwLock<HashMap<Did, Vec<WithdrawalInfo>>>,
}

impl InMemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn derive_address(did: &Did, account_id: &InternalAccountId) -> AccountAddress {
        let mut hasher = Sha256::new();
        hasher.update(did.as_str().as_bytes());
        hasher.update(b"/");
        hasher.update(account_id.storage_key().as_bytes());

        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        AccountAddress::new(bytes)
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get_project(&self, did: &Did) -> Result<ProjectDocument, SettlementError> {
        self.projects
            .read()
            .get(did)
            .cloned()
            .ok_or_else(|| SettlementError::ProjectNotFound(did.clone()))
    }

    async fn put_project(&self, doc: &ProjectDocument) -> Result<(), SettlementError> {
        self.projects
            .write()
            .insert(doc.project_did.clone(), doc.clone());
        Ok(())
    }

    async fn account_map(&self, did: &Did) -> AccountMap {
        self.accounts.read().get(did).cloned().unwrap_or_default()
    }

    async fn create_account(
        &self,
        did: &Did,
        account_id: &InternalAccountId,
    ) -> Result<AccountAddress, SettlementError> {
        let address = Self::derive_address(did, account_id);
        debug!(
            "[settlement] provisioned account {} for {did} at {address}",
            account_id.storage_key()
        );
        Ok(address)
    }

    async fn register_account(
        &self,
        did: &Did,
        account_id: &InternalAccountId,
        address: AccountAddress,
    ) {
        self.accounts
            .write()
            .entry(did.clone())
            .or_default()
            .insert(account_id.clone(), address);
    }

    async fn append_withdrawal(&self, did: &Did, info: WithdrawalInfo) {
        self.withdrawals
            .write()
            .entry(did.clone())
            .or_default()
            .push(info);
    }

    async fn withdrawals(&self, did: &Did) -> Vec<WithdrawalInfo> {
        self.withdrawals
            .read()
            .get(did)
            .cloned()
            .unwrap_or_default()
    }
}
