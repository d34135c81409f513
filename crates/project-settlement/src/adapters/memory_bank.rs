//! In-Memory Bank Adapter
//!
//! Implements the `BankLedger` port against process-local state. Stands in
//! for the hosting chain's bank module; production deployments wire the
//! engine to the real ledger instead.

use crate::domain::SettlementError;
use crate::ports::outbound::BankLedger;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AccountAddress, Coin};
use std::collections::HashMap;
use tracing::debug;

/// In-memory balance ledger keyed by `(address, denom)`.
#[derive(Default)]
pub struct InMemoryBank {
    balances: RwLock<HashMap<(AccountAddress, String), i64>>,
}

impl InMemoryBank {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a balance directly, bypassing transfer checks.
    pub fn set_balance(&self, address: AccountAddress, coin: Coin) {
        self.balances
            .write()
            .insert((address, coin.denom), coin.amount);
    }

    fn check_amount(coin: &Coin) -> Result<(), SettlementError> {
        if coin.amount < 0 {
            return Err(SettlementError::InvalidInput(format!(
                "negative transfer amount: {}",
                coin.amount
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BankLedger for InMemoryBank {
    async fn get_balance(
        &self,
        address: &AccountAddress,
        denom: &str,
    ) -> Result<i64, SettlementError> {
        Ok(*self
            .balances
            .read()
            .get(&(*address, denom.to_string()))
            .unwrap_or(&0))
    }

    async fn send(
        &self,
        from: &AccountAddress,
        to: &AccountAddress,
        coin: Coin,
    ) -> Result<(), SettlementError> {
        Self::check_amount(&coin)?;
        let mut balances = self.balances.write();
        let from_key = (*from, coin.denom.clone());
        let available = *balances.get(&from_key).unwrap_or(&0);
        if available < coin.amount {
            return Err(SettlementError::TransferFailed(format!(
                "insufficient balance in {from}: {available} < {}",
                coin.amount
            )));
        }
        *balances.entry(from_key).or_insert(0) -= coin.amount;
        *balances.entry((*to, coin.denom.clone())).or_insert(0) += coin.amount;
        debug!("[settlement] sent {coin} from {from} to {to}");
        Ok(())
    }

    async fn credit(&self, address: &AccountAddress, coin: Coin) -> Result<(), SettlementError> {
        Self::check_amount(&coin)?;
        let mut balances = self.balances.write();
        let entry = balances.entry((*address, coin.denom.clone())).or_insert(0);
        *entry = entry.checked_add(coin.amount).ok_or_else(|| {
            SettlementError::Internal(format!("balance overflow crediting {address}"))
        })?;
        Ok(())
    }

    async fn debit(&self, address: &AccountAddress, coin: Coin) -> Result<(), SettlementError> {
        Self::check_amount(&coin)?;
        let mut balances = self.balances.write();
        let key = (*address, coin.denom.clone());
        let available = *balances.get(&key).unwrap_or(&0);
        if available < coin.amount {
            return Err(SettlementError::TransferFailed(format!(
                "insufficient balance in {address}: {available} < {}",
                coin.amount
            )));
        }
        *balances.entry(key).or_insert(0) -= coin.amount;
        Ok(())
    }
}
