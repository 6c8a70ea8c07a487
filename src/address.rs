//! Account addresses.
//!
//! An address is exactly 20 bytes. Its canonical text form is `0x` followed by
//! 40 lowercase hex digits; parsing also accepts upper or mixed case and a
//! missing prefix.

use crate::error::ChainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ADDRESS_LENGTH: usize = 20;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChainError> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            ChainError::DecodingError(format!(
                "Address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Address(bytes))
    }

    /// Parse a hex address, with or without the `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self, ChainError> {
        let digits = hex_str
            .strip_prefix("0x")
            .or_else(|| hex_str.strip_prefix("0X"))
            .unwrap_or(hex_str);
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(ChainError::DecodingError(format!(
                "Address must be {} hex digits, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| ChainError::DecodingError(format!("Invalid hex address: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0xabcdef0123456789abcdef0123456789abcdef01";

    #[test]
    fn test_hex_roundtrip_is_lowercase() {
        let upper = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
        let address = Address::from_hex(upper).unwrap();
        assert_eq!(address.to_hex(), SAMPLE);
        assert_eq!(address.to_string(), SAMPLE);
    }

    #[test]
    fn test_prefix_is_optional() {
        let with = Address::from_hex(SAMPLE).unwrap();
        let without = Address::from_hex(&SAMPLE[2..]).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result = Address::from_hex("0xabcd");
        assert!(result.unwrap_err().to_string().contains("40 hex digits"));
        assert!(Address::from_slice(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_rejects_non_hex() {
        let bad = "0xzzcdef0123456789abcdef0123456789abcdef01";
        assert!(matches!(
            Address::from_hex(bad),
            Err(ChainError::DecodingError(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let address: Address = SAMPLE.parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", SAMPLE));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
