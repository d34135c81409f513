//! # Ports
//!
//! Inbound API trait and outbound collaborator traits.

pub mod inbound;
pub mod outbound;

pub use inbound::ProjectSettlementApi;
pub use outbound::{BankLedger, BridgeClient, FeeParams, MockBridgeClient, ProjectStore};
