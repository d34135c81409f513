//! # Domain Layer
//!
//! Entities, value objects, fixed-point arithmetic, errors, and invariants
//! for the settlement engine.

pub mod decimal;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use decimal::Dec;
pub use entities::{
    AccountMap, ForeignTransaction, ProjectDocument, SettlementConfig, WithdrawalInfo,
};
pub use errors::SettlementError;
pub use invariants::{invariant_non_negative, invariant_split_conserved, invariant_valid_progression};
pub use value_objects::{FeeParamKey, FeeType, InternalAccountId, ProjectStatus};
