//! # Cost Amounts
//!
//! The `cost` field is a 160-bit unsigned integer. Callers may supply
//! arbitrarily large integers; construction rejects anything at or above
//! 2^160 (and anything negative) instead of truncating.
//!
//! ## Serde
//!
//! [`serde_decimal`] reads a cost from configuration files, where a value
//! past 64 bits may be written as a decimal string. Batch files use the
//! JSON-number adapter in `keyring-vectors` instead.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};

use crate::error::EncodingError;
use crate::fields::check_width;

/// Width of the packed cost field in bytes.
pub const COST_LEN: usize = 20;

/// A cost value guaranteed to fit in 160 bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cost(BigUint);

impl Cost {
    /// Validate an unsigned integer against the 160-bit width.
    pub fn new(value: BigUint) -> Result<Self, EncodingError> {
        Self::try_from_bigint(&BigInt::from(value))
    }

    /// Validate a signed integer against the 160-bit width.
    pub fn try_from_bigint(value: &BigInt) -> Result<Self, EncodingError> {
        check_width("cost", value, COST_LEN).map(Self)
    }

    /// Any `u128` fits in 160 bits.
    pub fn from_u128(value: u128) -> Self {
        Self(BigUint::from(value))
    }

    /// Rebuild a cost from its packed big-endian representation.
    pub fn from_be_bytes(bytes: [u8; COST_LEN]) -> Self {
        Self(BigUint::from_bytes_be(&bytes))
    }

    /// The underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Big-endian, left-zero-padded to exactly 20 bytes.
    pub fn to_be_bytes(&self) -> [u8; COST_LEN] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; COST_LEN];
        // check_width guarantees raw.len() <= COST_LEN
        out[COST_LEN - raw.len()..].copy_from_slice(&raw);
        out
    }
}

impl FromStr for Cost {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_bigint(&parse_decimal("cost", s)?)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Parse a decimal integer, tolerating surrounding whitespace and `_`
/// digit separators.
pub fn parse_decimal(field: &'static str, input: &str) -> Result<BigInt, EncodingError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<BigInt>()
        .map_err(|_| EncodingError::InvalidInteger {
            field,
            input: input.to_string(),
        })
}

/// Serde adapter for configuration integers: reads a native integer or a
/// decimal string.
pub mod serde_decimal {
    use std::fmt;

    use num_bigint::BigInt;
    use num_traits::ToPrimitive;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    /// Serialize as a native integer when it fits in 64 bits, otherwise as
    /// a decimal string, which every YAML reader loads without loss.
    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(n) = value.to_u64() {
            serializer.serialize_u64(n)
        } else if let Some(n) = value.to_i64() {
            serializer.serialize_i64(n)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    /// Deserialize from an integer or a decimal string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a decimal integer string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            super::parse_decimal("integer", v).map_err(E::custom)
        }
    }
}
