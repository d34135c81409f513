//! # Settlement Service
//!
//! High-level service implementing the `ProjectSettlementApi` port.
//!
//! Every operation resolves the project's account ledger lazily, runs the
//! status guard where relevant, sizes transfers through the fee policy, and
//! executes them through the bank. Cross-chain payouts go through the bridge
//! and land in the reconciliation log.
//!
//! Multi-leg operations are not atomic: a leg that fails is surfaced to the
//! caller, but legs already completed stay completed. The hosting pipeline
//! serializes operations per project, so no interleaving hides inside one
//! call.

use crate::algorithms::{compute_evaluator_split, compute_transaction_fee};
use crate::domain::{
    invariant_non_negative, invariant_valid_progression, FeeParamKey, FeeType, InternalAccountId,
    ProjectDocument, ProjectStatus, SettlementConfig, SettlementError, WithdrawalInfo,
};
use crate::ports::inbound::ProjectSettlementApi;
use crate::ports::outbound::{BankLedger, BridgeClient, FeeParams, ProjectStore};
use async_trait::async_trait;
use shared_types::{AccountAddress, ActionId, Coin, Did, ForeignTxId};
use tracing::{debug, info, warn};

/// Settlement service wiring the outbound ports to the domain logic.
pub struct SettlementService<B, S, F, C> {
    bank: B,
    store: S,
    params: F,
    bridge: C,
    config: SettlementConfig,
}

impl<B, S, F, C> SettlementService<B, S, F, C>
where
    B: BankLedger,
    S: ProjectStore,
    F: FeeParams,
    C: BridgeClient,
{
    /// Create a new settlement service.
    pub fn new(bank: B, store: S, params: F, bridge: C, config: SettlementConfig) -> Self {
        Self {
            bank,
            store,
            params,
            bridge,
            config,
        }
    }

    /// The bank collaborator.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// The project store collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The bridge collaborator.
    pub fn bridge(&self) -> &C {
        &self.bridge
    }

    /// The engine configuration.
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    fn native(&self, amount: i64) -> Coin {
        Coin::new(self.config.denom.clone(), amount)
    }

    /// Resolve the ledger address for `(project_did, account_id)`,
    /// provisioning and registering it on first use.
    ///
    /// Idempotent: a second resolution of the same pair returns the same
    /// address and creates nothing.
    pub async fn resolve_account(
        &self,
        project_did: &Did,
        account_id: &InternalAccountId,
    ) -> Result<AccountAddress, SettlementError> {
        if let Some(address) = self.store.account_map(project_did).await.get(account_id) {
            return Ok(address);
        }

        let address = self.store.create_account(project_did, account_id).await?;
        self.store
            .register_account(project_did, account_id, address)
            .await;
        Ok(address)
    }

    /// Whether `(project_did, account_id)` has been provisioned. Pure
    /// lookup, no side effect.
    pub async fn has_account(&self, project_did: &Did, account_id: &InternalAccountId) -> bool {
        self.store.account_map(project_did).await.contains(account_id)
    }

    /// Native-token balance of a named account; zero when the account has
    /// not been provisioned yet.
    pub async fn native_balance(
        &self,
        project_did: &Did,
        account_id: &InternalAccountId,
    ) -> Result<i64, SettlementError> {
        let map = self.store.account_map(project_did).await;
        match map.get(account_id) {
            Some(address) => self.bank.get_balance(&address, &self.config.denom).await,
            None => Ok(0),
        }
    }

    /// Credit a verified external deposit to the project's primary account.
    ///
    /// One-way: nothing is debited anywhere. The trust boundary is the
    /// bridge's verification of the funding transaction.
    async fn fund_project(
        &self,
        doc: &ProjectDocument,
        amount: i64,
    ) -> Result<(), SettlementError> {
        let primary = InternalAccountId::primary(&doc.project_did);
        let address = self.resolve_account(&doc.project_did, &primary).await?;
        self.bank.credit(&address, self.native(amount)).await?;
        info!(
            "[settlement] funded project {} with {amount}{}",
            doc.project_did, self.config.denom
        );
        Ok(())
    }

    /// Fetch and verify a foreign funding transaction, then credit the
    /// funded amount.
    async fn fund_if_legitimate(
        &self,
        doc: &ProjectDocument,
        funding_tx_id: &str,
    ) -> Result<(), SettlementError> {
        let tx = self.bridge.fetch_foreign_transaction(funding_tx_id).await?;
        if !self.bridge.is_funding_transaction(&doc.project_did, &tx) {
            warn!(
                "[settlement] transaction {funding_tx_id} is not a funding transaction for {}",
                doc.project_did
            );
            return Err(SettlementError::VerificationFailed(format!(
                "{funding_tx_id} is not a funding transaction for {}",
                doc.project_did
            )));
        }

        let amount = self.bridge.extract_funded_amount(&tx);
        invariant_non_negative(amount, "funded amount")?;
        self.fund_project(doc, amount).await
    }

    /// Transfer the full balance of `from` into `to`.
    ///
    /// A zero balance is a no-op; a negative balance is an
    /// internal-consistency failure.
    async fn pay_all_fees_to_address(
        &self,
        project_did: &Did,
        from: &InternalAccountId,
        to: &InternalAccountId,
    ) -> Result<(), SettlementError> {
        let fees_to_pay = self.native_balance(project_did, from).await?;
        if fees_to_pay < 0 {
            return Err(SettlementError::Internal(format!(
                "negative balance {fees_to_pay} in {} of {project_did}",
                from.storage_key()
            )));
        }
        if fees_to_pay == 0 {
            return Ok(());
        }

        let to_address = self.resolve_account(project_did, to).await?;
        let from_address = self.resolve_account(project_did, from).await?;
        self.bank
            .send(&from_address, &to_address, self.native(fees_to_pay))
            .await
    }

    /// Sweep every pay-fee account into the platform fee account, then pay
    /// the aggregate out to the platform's foreign wallet.
    ///
    /// Aborts up front when the project has no registered foreign wallet.
    /// The sweeps are sequential and not rolled back on a later failure.
    async fn payout_fees(&self, project_did: &Did) -> Result<(), SettlementError> {
        self.bridge.resolve_foreign_wallet(project_did).await?;

        self.pay_all_fees_to_address(
            project_did,
            &InternalAccountId::IxoPayFees,
            &InternalAccountId::IxoFees,
        )
        .await?;
        self.pay_all_fees_to_address(
            project_did,
            &InternalAccountId::InitiatingNodePayFees,
            &InternalAccountId::IxoFees,
        )
        .await?;
        self.pay_all_fees_to_address(
            project_did,
            &InternalAccountId::ValidatingNodeSetFees,
            &InternalAccountId::IxoFees,
        )
        .await?;

        let platform_wallet = self.config.platform_foreign_wallet.clone();
        self.payout_and_reconcile(project_did, &InternalAccountId::IxoFees, &platform_wallet)
            .await
    }

    /// Burn a named account's balance in exchange for a foreign transfer,
    /// and record the withdrawal for audit.
    ///
    /// The local debit and the foreign initiation are two independent
    /// effects: a bridge failure after the debit leaves the balance reduced
    /// with no reconciliation entry recorded.
    async fn payout_and_reconcile(
        &self,
        project_did: &Did,
        account_id: &InternalAccountId,
        recipient_foreign_address: &str,
    ) -> Result<(), SettlementError> {
        let balance_to_pay = self.native_balance(project_did, account_id).await?;
        if balance_to_pay < 0 {
            return Err(SettlementError::Internal(format!(
                "negative balance {balance_to_pay} in {} of {project_did}",
                account_id.storage_key()
            )));
        }
        if balance_to_pay == 0 {
            return Ok(());
        }

        let project_wallet = self.bridge.resolve_foreign_wallet(project_did).await?;
        let address = self.resolve_account(project_did, account_id).await?;

        self.bank.debit(&address, self.native(balance_to_pay)).await?;

        let action_id = self
            .bridge
            .initiate_foreign_transfer(&project_wallet, recipient_foreign_address, balance_to_pay)
            .await?;

        self.record_withdrawal(
            project_did,
            action_id,
            project_wallet,
            recipient_foreign_address.to_string(),
            balance_to_pay,
        )
        .await;
        Ok(())
    }

    async fn record_withdrawal(
        &self,
        project_did: &Did,
        action_id: ActionId,
        source_foreign_wallet: String,
        recipient_foreign_address: String,
        amount: i64,
    ) {
        let info = WithdrawalInfo {
            action_id: format!("0x{}", hex::encode(action_id)),
            source_foreign_wallet,
            recipient_foreign_address,
            amount,
        };
        info!(
            "[settlement] recorded withdrawal {} of {amount}{} for {project_did}",
            info.action_id, self.config.denom
        );
        self.store.append_withdrawal(project_did, info).await;
    }

    /// Charge a transaction fee: split between the validating node set and
    /// the platform, both legs paid from the project's primary account.
    async fn process_fees(
        &self,
        project_did: &Did,
        fee_type: FeeType,
    ) -> Result<(), SettlementError> {
        let primary = InternalAccountId::primary(project_did);
        let project_address = self.resolve_account(project_did, &primary).await?;
        let node_address = self
            .resolve_account(project_did, &InternalAccountId::ValidatingNodeSetFees)
            .await?;
        let platform_address = self
            .resolve_account(project_did, &InternalAccountId::IxoFees)
            .await?;

        let configured_amount = match fee_type {
            FeeType::ClaimTransaction => self.params.get_dec(FeeParamKey::ClaimFeeAmount),
            FeeType::EvaluationTransaction => self.params.get_dec(FeeParamKey::EvaluationFeeAmount),
        };
        let split = compute_transaction_fee(
            configured_amount,
            self.params.get_dec(FeeParamKey::IxoFactor),
            self.params.get_dec(FeeParamKey::NodeFeePercentage),
        )?;
        debug!(
            "[settlement] {fee_type:?} fee for {project_did}: node {} / platform {}",
            split.node_amount, split.platform_amount
        );

        self.bank
            .send(&project_address, &node_address, self.native(split.node_amount))
            .await?;
        self.bank
            .send(
                &project_address,
                &platform_address,
                self.native(split.platform_amount),
            )
            .await?;
        Ok(())
    }

    /// Pay an evaluator from the project's primary account, splitting off
    /// node and platform fees.
    async fn pay_evaluator(
        &self,
        project_did: &Did,
        evaluator_did: &Did,
        evaluator_pay: i64,
    ) -> Result<(), SettlementError> {
        let primary = InternalAccountId::primary(project_did);
        let project_address = self.resolve_account(project_did, &primary).await?;
        let evaluator_address = self
            .resolve_account(project_did, &InternalAccountId::Did(evaluator_did.clone()))
            .await?;
        let node_address = self
            .resolve_account(project_did, &InternalAccountId::InitiatingNodePayFees)
            .await?;
        let platform_address = self
            .resolve_account(project_did, &InternalAccountId::IxoPayFees)
            .await?;

        let split = compute_evaluator_split(
            evaluator_pay,
            self.config.token_factor(),
            self.params.get_dec(FeeParamKey::EvaluationPayFeePercentage),
            self.params.get_dec(FeeParamKey::EvaluationPayNodeFeePercentage),
        )?;
        debug!(
            "[settlement] evaluator payout for {project_did}: payee {} / node {} / platform {}",
            split.payee_amount, split.node_fee_amount, split.platform_fee_amount
        );

        self.bank
            .send(
                &project_address,
                &evaluator_address,
                self.native(split.payee_amount),
            )
            .await?;
        self.bank
            .send(
                &project_address,
                &node_address,
                self.native(split.node_fee_amount),
            )
            .await?;
        self.bank
            .send(
                &project_address,
                &platform_address,
                self.native(split.platform_fee_amount),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<B, S, F, C> ProjectSettlementApi for SettlementService<B, S, F, C>
where
    B: BankLedger,
    S: ProjectStore,
    F: FeeParams,
    C: BridgeClient,
{
    async fn create_project(&self, doc: ProjectDocument) -> Result<(), SettlementError> {
        self.resolve_account(&doc.project_did, &InternalAccountId::IxoFees)
            .await?;
        self.resolve_account(
            &doc.project_did,
            &InternalAccountId::primary(&doc.project_did),
        )
        .await?;

        self.store.put_project(&doc).await?;
        info!("[settlement] created project {}", doc.project_did);
        Ok(())
    }

    async fn update_project_status(
        &self,
        project_did: &Did,
        requested: ProjectStatus,
        funding_tx_id: Option<ForeignTxId>,
    ) -> Result<(), SettlementError> {
        let mut doc = self.store.get_project(project_did).await?;

        let funding_tx_id = funding_tx_id.unwrap_or_default();
        if requested == ProjectStatus::Funded && funding_tx_id.is_empty() {
            return Err(SettlementError::InvalidInput(
                "empty funding transaction id".to_string(),
            ));
        }
        invariant_valid_progression(doc.status, requested)?;

        if requested == ProjectStatus::Funded {
            self.fund_if_legitimate(&doc, &funding_tx_id).await?;
        }
        if requested == ProjectStatus::Paidout {
            self.payout_fees(project_did).await?;
        }

        doc.status = requested;
        self.store.put_project(&doc).await?;
        info!("[settlement] project {project_did} moved to {requested:?}");
        Ok(())
    }

    async fn create_agent(
        &self,
        project_did: &Did,
        agent_did: &Did,
    ) -> Result<(), SettlementError> {
        self.resolve_account(project_did, &InternalAccountId::Did(agent_did.clone()))
            .await?;
        Ok(())
    }

    async fn create_claim(&self, project_did: &Did) -> Result<(), SettlementError> {
        self.process_fees(project_did, FeeType::ClaimTransaction).await
    }

    async fn create_evaluation(
        &self,
        project_did: &Did,
        evaluator_did: &Did,
    ) -> Result<(), SettlementError> {
        self.process_fees(project_did, FeeType::EvaluationTransaction)
            .await?;

        let doc = self.store.get_project(project_did).await?;
        if doc.evaluator_pay != 0 {
            self.pay_evaluator(project_did, evaluator_did, doc.evaluator_pay)
                .await?;
        }
        Ok(())
    }

    async fn withdraw_funds(
        &self,
        project_did: &Did,
        requestor_did: &Did,
        foreign_wallet: String,
        is_refund: bool,
    ) -> Result<(), SettlementError> {
        let doc = self.store.get_project(project_did).await?;
        if doc.status != ProjectStatus::Paidout {
            return Err(SettlementError::InvalidTransition {
                from: doc.status,
                to: ProjectStatus::Paidout,
            });
        }

        if is_refund {
            let recipient = self.bridge.resolve_foreign_wallet(project_did).await?;
            self.payout_and_reconcile(
                project_did,
                &InternalAccountId::primary(project_did),
                &recipient,
            )
            .await
        } else {
            self.payout_and_reconcile(
                project_did,
                &InternalAccountId::Did(requestor_did.clone()),
                &foreign_wallet,
            )
            .await
        }
    }
}
