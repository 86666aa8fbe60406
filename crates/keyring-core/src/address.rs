//! # Trading Address
//!
//! A 20-byte account address. Parsed from a hex string (the `0x` prefix is
//! optional); EIP-55 checksum casing is accepted but not validated.
//! Renders as `0x`-prefixed lowercase hex.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;
use crate::hexstr;

/// Width of a trading address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte trading address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradingAddress([u8; ADDRESS_LEN]);

impl TradingAddress {
    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an address from a slice, which must be exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            EncodingError::InvalidAddress(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Return the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for TradingAddress {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hexstr::decode_prefixed(s)
            .map_err(|e| EncodingError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for TradingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hexstr::encode_prefixed(self.0))
    }
}

impl fmt::Debug for TradingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TradingAddress({self})")
    }
}

impl Serialize for TradingAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TradingAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x0123456789abcDEF0123456789abCDef01234567";

    #[test]
    fn parses_checksummed_address() {
        let addr: TradingAddress = CHECKSUMMED.parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0x01);
        assert_eq!(addr.as_bytes()[19], 0x67);
        assert_eq!(
            addr.to_string(),
            "0x0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn prefix_is_optional() {
        let with: TradingAddress = CHECKSUMMED.parse().unwrap();
        let without: TradingAddress = CHECKSUMMED[2..].parse().unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn wrong_length_rejected() {
        for input in ["0x", "0x0123", "0x0123456789abcdef0123456789abcdef0123456789"] {
            assert!(
                matches!(
                    input.parse::<TradingAddress>(),
                    Err(EncodingError::InvalidAddress(_))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn non_hex_rejected() {
        let err = "0x0123456789abcdef0123456789abcdef0123456g"
            .parse::<TradingAddress>()
            .unwrap_err();
        assert!(matches!(err, EncodingError::InvalidAddress(_)));
    }

    #[test]
    fn serde_json_uses_lowercase_hex() {
        let addr: TradingAddress = CHECKSUMMED.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0123456789abcdef0123456789abcdef01234567\"");
        let back: TradingAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
