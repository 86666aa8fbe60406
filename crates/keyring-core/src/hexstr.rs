//! # Prefixed Hex Strings
//!
//! Every byte field in an emitted vector is rendered as a `0x`-prefixed
//! lowercase hex string. Parsing accepts the prefix in either case, or no
//! prefix at all, and mixed-case digits (checksummed addresses decode
//! unchanged).

use crate::error::EncodingError;

/// Render bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string, with or without a `0x` prefix.
pub fn decode_prefixed(s: &str) -> Result<Vec<u8>, EncodingError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| EncodingError::InvalidHex(format!("{s:?}: {e}")))
}

/// Serde adapter for `Vec<u8>` fields stored as prefixed hex strings.
///
/// Use with `#[serde(with = "keyring_core::hexstr::serde_bytes")]`.
pub mod serde_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a `0x`-prefixed hex string.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_prefixed(bytes))
    }

    /// Deserialize bytes from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::decode_prefixed(&s).map_err(serde::de::Error::custom)
    }
}
