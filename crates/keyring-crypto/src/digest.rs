//! # Digests
//!
//! SHA-256 is the message digest signed under PKCS#1 v1.5. Keccak-256 of
//! the modulus bytes is the identifier a ledger client registers a key
//! under.

use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Length of both digests in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 over the message bytes.
pub fn message_digest(message: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(message).into()
}

/// Keccak-256 over a key's modulus bytes.
pub fn key_hash(modulus: &[u8]) -> [u8; DIGEST_LEN] {
    Keccak256::digest(modulus).into()
}
