//! # Domain Errors
//!
//! Error types for the settlement engine.

use super::value_objects::ProjectStatus;
use shared_types::Did;
use thiserror::Error;

/// Settlement error types.
///
/// Validation failures (`InvalidTransition`, `InvalidInput`) are raised
/// before any mutation. Mid-sequence failures in multi-leg operations are
/// surfaced to the caller without rolling back legs already completed.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Project document absent from the store.
    #[error("Project not found: {0}")]
    ProjectNotFound(Did),

    /// Named account absent from the project's account map.
    #[error("Account {account} not found under project {project}")]
    AccountNotFound {
        /// Owning project.
        project: Did,
        /// Storage key of the missing account.
        account: String,
    },

    /// Requested status is not a legal progression from the current one.
    #[error("Invalid status progression: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current status.
        from: ProjectStatus,
        /// Requested status.
        to: ProjectStatus,
    },

    /// Malformed caller input (empty funding transaction id, negative pay).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The bridge rejected a foreign transaction as illegitimate.
    #[error("Funding verification failed: {0}")]
    VerificationFailed(String),

    /// A ledger transfer was rejected (e.g. insufficient balance).
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// A foreign-chain call through the bridge errored.
    #[error("Bridge call failed: {0}")]
    BridgeFailed(String),

    /// Internal-consistency failure (negative ledger balance, arithmetic
    /// overflow mid-split).
    #[error("Internal consistency failure: {0}")]
    Internal(String),
}
