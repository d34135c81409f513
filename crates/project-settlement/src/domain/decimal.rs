//! # Fixed-Point Decimal
//!
//! Non-negative 18-digit fixed-point arithmetic for fee computation.
//!
//! All intermediate fee values are held as [`Dec`] at full 18-digit
//! precision; rounding happens exactly once, at [`Dec::round_to_i64`], when
//! an integer transfer amount is produced. The rounding mode is
//! half-away-from-zero, which on this non-negative domain is plain half-up.

use super::errors::SettlementError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits carried by every [`Dec`].
const DECIMAL_PLACES: usize = 18;

/// A non-negative fixed-point decimal with 18 fractional digits.
///
/// Backed by a `U256` so that products of token-scale amounts and
/// percentages never overflow mid-computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dec(U256);

impl Dec {
    fn scale() -> U256 {
        U256::exp10(DECIMAL_PLACES)
    }

    /// The value zero.
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// The value one.
    pub fn one() -> Self {
        Self(Self::scale())
    }

    /// True when the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Construct from an unsigned integer.
    pub fn from_uint(n: u64) -> Self {
        Self(U256::from(n) * Self::scale())
    }

    /// Construct from a signed integer; negative values are caller defects.
    pub fn from_int(n: i64) -> Result<Self, SettlementError> {
        if n < 0 {
            return Err(SettlementError::InvalidInput(format!(
                "negative amount: {n}"
            )));
        }
        Ok(Self::from_uint(n as u64))
    }

    /// Construct from a ratio, truncated to 18 fractional digits.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Result<Self, SettlementError> {
        if denominator == 0 {
            return Err(SettlementError::InvalidInput(
                "zero denominator".to_string(),
            ));
        }
        Ok(Self(
            U256::from(numerator) * Self::scale() / U256::from(denominator),
        ))
    }

    /// Construct `n` percent (`n / 100`).
    pub fn percent(n: u64) -> Self {
        Self(U256::from(n) * Self::scale() / U256::from(100u64))
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Checked subtraction; `None` signals a negative computed amount.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Checked multiplication, truncated to 18 fractional digits.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(|wide| Self(wide / Self::scale()))
    }

    /// Produce an integer transfer amount, rounding half-away-from-zero.
    pub fn round_to_i64(self) -> Result<i64, SettlementError> {
        let half = Self::scale() / 2;
        let bumped = self
            .0
            .checked_add(half)
            .ok_or_else(|| SettlementError::Internal("decimal overflow while rounding".to_string()))?;
        let rounded = bumped / Self::scale();
        if rounded > U256::from(i64::MAX as u64) {
            return Err(SettlementError::Internal(
                "rounded amount exceeds i64 range".to_string(),
            ));
        }
        Ok(rounded.as_u64() as i64)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / Self::scale();
        let frac = self.0 % Self::scale();
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let frac = format!("{:0>width$}", frac.to_string(), width = DECIMAL_PLACES);
        write!(f, "{}.{}", int, frac.trim_end_matches('0'))
    }
}
