//! Fixed-point inflation multiplier and gon conversion.
//!
//! Balances are stored internally in "gons". A holder's visible balance is
//! `gons / multiplier`, so a rebase rescales every balance at once without
//! touching any individual account. The multiplier is a fixed-point number with
//! denominator 10^18; the ledger starts at exactly 10^18 (a factor of 1.0).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// Fixed-point denominator for every multiplier value.
pub const DENOMINATOR: u128 = 1_000_000_000_000_000_000;

/// Cumulative inflation multiplier.
///
/// Never zero: every constructor and [`Multiplier::rebase`] rejects a zero
/// result, so [`Multiplier::to_tokens`] can divide unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct Multiplier(u128);

impl Multiplier {
    /// The multiplier every ledger starts from (1.0).
    pub const INITIAL: Self = Self(DENOMINATOR);

    pub fn new(raw: u128) -> Result<Self, TypesError> {
        if raw == 0 {
            return Err(TypesError::ZeroMultiplier);
        }
        Ok(Self(raw))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Compound a raw rebase factor into this multiplier:
    /// `self * raw / DENOMINATOR`.
    pub fn rebase(self, raw: u128) -> Result<Self, TypesError> {
        if raw == 0 {
            return Err(TypesError::ZeroMultiplier);
        }
        let product = self.0.checked_mul(raw).ok_or(TypesError::Overflow)?;
        Self::new(product / DENOMINATOR)
    }

    /// Convert a visible token amount into gons.
    pub fn to_gons(self, amount: u128) -> Result<u128, TypesError> {
        amount.checked_mul(self.0).ok_or(TypesError::Overflow)
    }

    /// Convert gons into a visible token amount (truncating).
    pub fn to_tokens(self, gons: u128) -> u128 {
        gons / self.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl TryFrom<u128> for Multiplier {
    type Error = TypesError;

    fn try_from(raw: u128) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Multiplier> for u128 {
    fn from(m: Multiplier) -> Self {
        m.0
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / DENOMINATOR;
        let frac = self.0 % DENOMINATOR;
        write!(f, "{whole}.{frac:018}x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_multiplier_is_identity() {
        let m = Multiplier::INITIAL;
        assert_eq!(m.to_tokens(m.to_gons(1000).unwrap()), 1000);
    }

    #[test]
    fn zero_multiplier_rejected() {
        assert_eq!(Multiplier::new(0), Err(TypesError::ZeroMultiplier));
        assert_eq!(Multiplier::INITIAL.rebase(0), Err(TypesError::ZeroMultiplier));
    }

    #[test]
    fn rebase_compounds() {
        let doubled = Multiplier::INITIAL.rebase(2 * DENOMINATOR).unwrap();
        assert_eq!(doubled.raw(), 2 * DENOMINATOR);
        let quadrupled = doubled.rebase(2 * DENOMINATOR).unwrap();
        assert_eq!(quadrupled.raw(), 4 * DENOMINATOR);
    }

    #[test]
    fn rebase_that_truncates_to_zero_is_rejected() {
        let tiny = Multiplier::new(1).unwrap();
        assert_eq!(tiny.rebase(DENOMINATOR / 2), Err(TypesError::ZeroMultiplier));
    }

    #[test]
    fn rebase_overflow_is_reported() {
        let big = Multiplier::new(u128::MAX / 2).unwrap();
        assert_eq!(big.rebase(3 * DENOMINATOR), Err(TypesError::Overflow));
    }

    #[test]
    fn balances_shrink_when_multiplier_grows() {
        let m0 = Multiplier::INITIAL;
        let gons = m0.to_gons(1000).unwrap();
        let m1 = m0.rebase(2 * DENOMINATOR).unwrap();
        assert_eq!(m1.to_tokens(gons), 500);
    }

    #[test]
    fn display_renders_fixed_point() {
        assert_eq!(Multiplier::INITIAL.to_string(), "1.000000000000000000x");
        let half = Multiplier::new(DENOMINATOR / 2).unwrap();
        assert_eq!(half.to_string(), "0.500000000000000000x");
    }
}
