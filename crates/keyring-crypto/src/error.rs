//! # Cryptographic Error Types
//!
//! Structured errors for key generation, signing, verification and key
//! export. A signature that simply does not verify is *not* an error:
//! [`verify`](crate::verify) returns `Ok(false)` for that. These types
//! cover inputs that cannot be processed at all.

use thiserror::Error;

/// The primitive could not produce a usable exponent-3 modulus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyGenerationError {
    /// Every bounded attempt failed.
    #[error("RSA key generation failed after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Number of attempts made.
        attempts: usize,
        /// Reason the final attempt was rejected.
        last_error: String,
    },
}

/// A signature could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// EMSA-PKCS1-v1_5 needs more bytes than the modulus provides.
    #[error("encoded digest needs {required} bytes but modulus has {modulus_len}")]
    DigestTooLarge {
        /// Minimum modulus length for a SHA-256 DigestInfo.
        required: usize,
        /// Actual modulus length in bytes.
        modulus_len: usize,
    },

    /// The RSA primitive rejected the operation.
    #[error("RSA signing failed: {0}")]
    Primitive(String),
}

/// Verification could not be attempted because an input is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The public key is structurally invalid.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The modulus is too short to hold a SHA-256 DigestInfo encoding.
    #[error("modulus of {modulus_len} bytes cannot hold a {required}-byte encoded digest")]
    ModulusTooSmall {
        /// Minimum modulus length for a SHA-256 DigestInfo.
        required: usize,
        /// Actual modulus length in bytes.
        modulus_len: usize,
    },

    /// A hex-encoded key or signature could not be decoded.
    #[error("hex decode error: {0}")]
    HexDecode(String),
}

/// PEM export or import of a key failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyEncodingError {
    /// PEM/DER encoding or decoding failed.
    #[error("PEM error: {0}")]
    Pem(String),

    /// The decoded key is not a 1024-bit, exponent-3 key.
    #[error("unsupported key parameters: {0}")]
    Parameters(String),
}
