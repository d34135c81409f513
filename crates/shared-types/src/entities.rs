//! Core primitives shared across the settlement workspace.
//!
//! Everything here is deliberately small: a decentralized identifier, a
//! 20-byte ledger address, and a single-denomination coin. Richer domain
//! types live in the crates that own them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single denomination all internal transfers use.
pub const NATIVE_TOKEN: &str = "ixo";

/// A foreign-chain transaction identifier, as supplied by callers.
///
/// Opaque to this runtime; only the bridge interprets it.
pub type ForeignTxId = String;

/// A bridge-assigned action identifier for an initiated foreign transfer.
pub type ActionId = [u8; 32];

/// Decentralized identifier for a project or an agent.
///
/// Treated as an opaque string key. Identity semantics (resolution, key
/// material, credential issuance) are out of scope for this runtime.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Create a new DID from any string-like value.
    pub fn new(did: impl Into<String>) -> Self {
        Self(did.into())
    }

    /// The underlying string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no content.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Did {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A 20-byte ledger account address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountAddress([u8; 20]);

impl AccountAddress {
    /// Wrap raw address bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A (denomination, amount) pair.
///
/// Amounts are signed to match the ledger contract, but every engine
/// operation checks non-negativity before moving value; a negative amount
/// reaching a transfer is a defect upstream, not a valid state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. [`NATIVE_TOKEN`].
    pub denom: String,
    /// Integer amount in the smallest unit.
    pub amount: i64,
}

impl Coin {
    /// Create a coin in the given denomination.
    pub fn new(denom: impl Into<String>, amount: i64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Convenience constructor for the native token.
    pub fn native(amount: i64) -> Self {
        Self::new(NATIVE_TOKEN, amount)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
