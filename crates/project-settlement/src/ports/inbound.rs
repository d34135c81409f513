//! # Inbound Ports
//!
//! API trait defining the settlement operations the engine exposes.

use crate::domain::{ProjectDocument, ProjectStatus, SettlementError};
use async_trait::async_trait;
use shared_types::{Did, ForeignTxId};

/// Project settlement API - inbound port.
///
/// Operations are invoked sequentially and run to completion by the hosting
/// transaction-processing pipeline; no two operations run concurrently
/// against the same project state.
#[async_trait]
pub trait ProjectSettlementApi: Send + Sync {
    /// Store a new project and provision its fee and primary accounts.
    async fn create_project(&self, doc: ProjectDocument) -> Result<(), SettlementError>;

    /// Apply a lifecycle transition, running the financial side effects the
    /// target status requires.
    ///
    /// Entering `Funded` needs a non-empty foreign funding transaction id;
    /// entering `Paidout` sweeps and reconciles fees before the status is
    /// persisted.
    async fn update_project_status(
        &self,
        project_did: &Did,
        requested: ProjectStatus,
        funding_tx_id: Option<ForeignTxId>,
    ) -> Result<(), SettlementError>;

    /// Provision an agent's account under the project.
    async fn create_agent(&self, project_did: &Did, agent_did: &Did)
        -> Result<(), SettlementError>;

    /// Charge the claim-transaction fee.
    async fn create_claim(&self, project_did: &Did) -> Result<(), SettlementError>;

    /// Charge the evaluation-transaction fee and, when the project
    /// configures one, pay the evaluator.
    async fn create_evaluation(
        &self,
        project_did: &Did,
        evaluator_did: &Did,
    ) -> Result<(), SettlementError>;

    /// Withdraw settled funds to a foreign address.
    ///
    /// Requires `Paidout` status. A refund pays the project's primary
    /// account out to its registered foreign wallet; otherwise the
    /// requestor's account pays out to the supplied wallet.
    async fn withdraw_funds(
        &self,
        project_did: &Did,
        requestor_did: &Did,
        foreign_wallet: String,
        is_refund: bool,
    ) -> Result<(), SettlementError>;
}
