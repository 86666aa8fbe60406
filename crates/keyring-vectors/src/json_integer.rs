//! # JSON Integers
//!
//! Serde adapter for arbitrary-precision integers in batch files. Values
//! are always written as bare JSON numbers, including a cost anywhere in
//! the 160-bit range.
//!
//! Both directions go through [`RawValue`], which carries the literal
//! number text. `serde_json` would otherwise read an integer past 64 bits
//! as a float. A decimal string is also accepted on input.

use keyring_core::cost::parse_decimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// Serialize as a JSON number of any size.
pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    if let Some(n) = value.to_i64() {
        return serializer.serialize_i64(n);
    }
    RawValue::from_string(value.to_string())
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Deserialize from a JSON integer of any size, or a decimal string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = raw.get().trim();
    let digits = if text.starts_with('"') {
        serde_json::from_str::<String>(text).map_err(D::Error::custom)?
    } else {
        text.to_string()
    };
    parse_decimal("integer", &digits).map_err(D::Error::custom)
}
