//! Account address type, rendered as `0x`-prefixed hex.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A 20-byte account identifier.
///
/// The all-zero address is the null account: it is the `from` side of a mint
/// and the `to` side of a burn, and can never hold a balance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// The null account.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse a hex address, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| TypesError::InvalidAddress(format!("{s}: expected 20 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_hex()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1; 20]).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let a = Address::new([0xab; 20]);
        let hex = a.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.parse::<Address>().unwrap(), a);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), a);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Address::from_hex("0xabcd").unwrap_err();
        assert!(matches!(err, TypesError::InvalidAddress(_)));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Address::from_hex("0xzz").is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let a = Address::new([0x11; 20]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"{}\"", a.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
