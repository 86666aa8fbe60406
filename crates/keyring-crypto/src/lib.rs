//! # keyring-crypto — Credential Signing Primitives
//!
//! Provides the cryptographic building blocks for Keyring credentials:
//!
//! - **RSA e=3** key generation with a 1024-bit modulus.
//! - **PKCS#1 v1.5 / SHA-256** signing and verification over the packed
//!   message bytes produced by `keyring-core`.
//! - **Keccak-256** key hashing, the identifier a ledger client uses for a
//!   registered key.
//! - **PEM** export and import (PKCS#1 private, SPKI public).
//!
//! ## Crate Policy
//!
//! - Depends only on `keyring-core` internally.
//! - Padding and modular arithmetic come from the `rsa` crate. Tests
//!   open signatures with `s^3 mod n` and compare against a hand-built
//!   PKCS#1 v1.5 block.
//! - No `unsafe` code.

pub mod digest;
pub mod error;
pub mod signer;

pub use digest::{key_hash, message_digest, DIGEST_LEN};
pub use error::{KeyEncodingError, KeyGenerationError, SigningError, VerificationError};
pub use signer::{
    verify, verify_hex, CredentialKeyPair, CredentialPublicKey, CredentialSignature,
    MIN_MODULUS_LEN, MODULUS_BITS, MODULUS_LEN, PUBLIC_EXPONENT,
};
