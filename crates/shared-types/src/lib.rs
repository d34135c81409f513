//! # Shared Types Crate
//!
//! Cross-crate primitives for the settlement runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers, addresses, and coin types used
//!   across the workspace are defined here.
//! - **Opaque identifiers**: a `Did` is never parsed or validated beyond
//!   non-emptiness; its structure belongs to the identity layer, not to the
//!   settlement engine.
//! - **Single denomination**: every internal transfer is denominated in
//!   `NATIVE_TOKEN`.

pub mod entities;

pub use entities::*;
