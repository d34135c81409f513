//! # Algorithms
//!
//! Pure computation for the settlement engine: fee and payout splitting.

pub mod fees;

pub use fees::{
    compute_evaluator_split, compute_transaction_fee, EvaluatorPaySplit, TransactionFeeSplit,
};
