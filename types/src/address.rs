//! 20-byte account address.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte account identifier.
///
/// Derived from the account's ECDSA public key (last 20 bytes of the Blake2b
/// digest of the uncompressed key). The all-zero address is reserved: a
/// bucket whose candidate is zero is unbonded from any candidate, and a
/// transaction whose origin is zero is a reward (mint) transaction.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Parse an address from a `0x`-prefixed (or bare) hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped).map_err(|_| TypeError::BadAddress(s.to_string()))?;
        if raw.len() != 20 {
            return Err(TypeError::BadAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..)")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }

    #[test]
    fn hex_roundtrip() {
        let a = Address::new([0xAB; 20]);
        let s = a.to_string();
        assert_eq!(Address::from_hex(&s).unwrap(), a);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("not hex").is_err());
    }
}
