//! # RSA Exponent-3 Credential Signing
//!
//! Key generation, signing and verification for the single parameter set
//! the credential verifier understands: a 1024-bit modulus, public
//! exponent 3, SHA-256, and PKCS#1 v1.5 padding.
//!
//! ## Security Invariant
//!
//! - `CredentialKeyPair` does not implement `Serialize`, and its `Debug`
//!   output is redacted. Private keys leave memory only through the
//!   explicit PKCS#1 PEM export.
//! - `CredentialPublicKey` can only be built from a modulus that is odd,
//!   exactly 1024 bits, and accepted by the `rsa` crate's public key checks.
//!   The exponent is implicit and always 3.
//! - Only a [`PackedMessage`] can be signed. Arbitrary byte strings go
//!   through `keyring-core`'s encoder first.
//! - Signing and verification are the `rsa` crate's PKCS#1 v1.5 scheme
//!   (CRT, blinded with the OS RNG). Nothing here touches the raw
//!   exponentiation.
//! - `verify` returns `Ok(false)` for any signature that does not check
//!   out, including wrong length and out-of-range values. `Err` is
//!   reserved for keys too small to carry the encoded digest.
//!
//! ## Serde
//!
//! - Public keys serialize as the `0x`-prefixed hex modulus.
//! - Signatures serialize as `0x`-prefixed hex strings.

use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;

use keyring_core::{hexstr, PackedMessage};

use crate::digest::{key_hash, message_digest, DIGEST_LEN};
use crate::error::{KeyEncodingError, KeyGenerationError, SigningError, VerificationError};

/// Modulus size in bits.
pub const MODULUS_BITS: usize = 1024;

/// Modulus (and signature) size in bytes.
pub const MODULUS_LEN: usize = MODULUS_BITS / 8;

/// The fixed public exponent.
pub const PUBLIC_EXPONENT: u32 = 3;

/// Upper bound on generation attempts before giving up.
pub const KEYGEN_MAX_ATTEMPTS: usize = 8;

/// Smallest modulus, in bytes, that can carry a PKCS#1 v1.5 SHA-256
/// encoding: 19 bytes of DigestInfo prefix, the 32-byte digest, and 11
/// bytes of padding overhead.
pub const MIN_MODULUS_LEN: usize = 19 + DIGEST_LEN + 11;

/// An RSA public key with exponent 3.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPublicKey {
    inner: RsaPublicKey,
}

/// A PKCS#1 v1.5 signature, exactly one modulus length long when produced
/// by [`CredentialKeyPair::sign`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CredentialSignature(Vec<u8>);

/// An RSA private key with exponent 3 and its public half.
pub struct CredentialKeyPair {
    private: RsaPrivateKey,
    public: CredentialPublicKey,
}

// ---------------------------------------------------------------------------
// CredentialPublicKey impls
// ---------------------------------------------------------------------------

impl CredentialPublicKey {
    /// Build a public key from big-endian modulus bytes, exponent 3 implied.
    pub fn from_modulus(modulus: &[u8]) -> Result<Self, VerificationError> {
        let n = BigUint::from_bytes_be(modulus);
        if n.bits() as usize != MODULUS_BITS {
            return Err(VerificationError::InvalidPublicKey(format!(
                "modulus must be {MODULUS_BITS} bits, got {}",
                n.bits()
            )));
        }
        if modulus.last().map_or(true, |b| b & 1 == 0) {
            return Err(VerificationError::InvalidPublicKey(
                "modulus must be odd".to_string(),
            ));
        }
        let inner = RsaPublicKey::new(n, BigUint::from(PUBLIC_EXPONENT))
            .map_err(|e| VerificationError::InvalidPublicKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Parse a public key from a hex modulus, `0x` prefix optional.
    pub fn from_hex(hex: &str) -> Result<Self, VerificationError> {
        let bytes =
            hexstr::decode_prefixed(hex).map_err(|e| VerificationError::HexDecode(e.to_string()))?;
        Self::from_modulus(&bytes)
    }

    /// Parse an SPKI ("BEGIN PUBLIC KEY") PEM document.
    pub fn from_public_key_pem(pem: &str) -> Result<Self, KeyEncodingError> {
        let inner =
            RsaPublicKey::from_public_key_pem(pem).map_err(|e| KeyEncodingError::Pem(e.to_string()))?;
        let key = Self::from_modulus(&inner.n().to_bytes_be())
            .map_err(|e| KeyEncodingError::Parameters(e.to_string()))?;
        if inner.e() != &BigUint::from(PUBLIC_EXPONENT) {
            return Err(KeyEncodingError::Parameters(format!(
                "public exponent must be {PUBLIC_EXPONENT}, got {}",
                inner.e()
            )));
        }
        Ok(key)
    }

    /// Export as an SPKI ("BEGIN PUBLIC KEY") PEM document.
    pub fn to_public_key_pem(&self) -> Result<String, KeyEncodingError> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyEncodingError::Pem(e.to_string()))
    }

    /// Modulus as big-endian bytes, left-padded to the modulus length.
    pub fn modulus_bytes(&self) -> Vec<u8> {
        left_pad(&self.inner.n().to_bytes_be(), self.size())
    }

    /// Modulus as a `0x`-prefixed lowercase hex string.
    pub fn modulus_hex(&self) -> String {
        hexstr::encode_prefixed(self.modulus_bytes())
    }

    /// Modulus length in bytes.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Keccak-256 of the modulus bytes.
    pub fn key_hash(&self) -> [u8; DIGEST_LEN] {
        key_hash(&self.modulus_bytes())
    }

    /// Access the underlying `rsa` key.
    pub fn as_rsa(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl Serialize for CredentialPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.modulus_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for CredentialPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialPublicKey({}...)", hex_prefix(&self.modulus_bytes()))
    }
}

impl std::fmt::Display for CredentialPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.modulus_hex())
    }
}

// ---------------------------------------------------------------------------
// CredentialSignature impls
// ---------------------------------------------------------------------------

impl CredentialSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as a `0x`-prefixed lowercase hex string.
    pub fn to_hex(&self) -> String {
        hexstr::encode_prefixed(&self.0)
    }

    /// Parse from a hex string, `0x` prefix optional.
    pub fn from_hex(hex: &str) -> Result<Self, VerificationError> {
        hexstr::decode_prefixed(hex)
            .map(Self)
            .map_err(|e| VerificationError::HexDecode(e.to_string()))
    }
}

impl Serialize for CredentialSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for CredentialSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialSignature({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for CredentialSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// CredentialKeyPair impls
// ---------------------------------------------------------------------------

impl CredentialKeyPair {
    /// Generate a fresh 1024-bit, exponent-3 key from the OS RNG.
    pub fn generate() -> Result<Self, KeyGenerationError> {
        Self::generate_with_rng(&mut rand::rngs::OsRng)
    }

    /// Generate a fresh key from the given RNG.
    ///
    /// Prime pairs where `p - 1` or `q - 1` shares a factor with 3 are
    /// retried inside the `rsa` crate. A produced key that still fails the
    /// parameter checks is discarded and generation starts over, up to
    /// [`KEYGEN_MAX_ATTEMPTS`] times.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> Result<Self, KeyGenerationError> {
        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let mut last_error = String::new();
        for attempt in 1..=KEYGEN_MAX_ATTEMPTS {
            let outcome = RsaPrivateKey::new_with_exp(rng, MODULUS_BITS, &exponent)
                .map_err(|e| e.to_string())
                .and_then(Self::from_private);
            match outcome {
                Ok(pair) => return Ok(pair),
                Err(reason) => {
                    tracing::warn!(attempt, %reason, "discarding RSA key generation attempt");
                    last_error = reason;
                }
            }
        }
        Err(KeyGenerationError::Exhausted {
            attempts: KEYGEN_MAX_ATTEMPTS,
            last_error,
        })
    }

    /// Check parameters of a private key and wrap it.
    fn from_private(private: RsaPrivateKey) -> Result<Self, String> {
        private.validate().map_err(|e| e.to_string())?;
        if private.e() != &BigUint::from(PUBLIC_EXPONENT) {
            return Err(format!("public exponent is {}, not {PUBLIC_EXPONENT}", private.e()));
        }
        let public = CredentialPublicKey::from_modulus(&private.n().to_bytes_be())
            .map_err(|e| e.to_string())?;
        Ok(Self { private, public })
    }

    /// Import a PKCS#1 ("BEGIN RSA PRIVATE KEY") PEM document.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self, KeyEncodingError> {
        let private =
            RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| KeyEncodingError::Pem(e.to_string()))?;
        Self::from_private(private).map_err(KeyEncodingError::Parameters)
    }

    /// Export the private key as a PKCS#1 PEM document.
    pub fn to_pkcs1_pem(&self) -> Result<String, KeyEncodingError> {
        self.private
            .to_pkcs1_pem(LineEnding::LF)
            .map(|pem| String::from(pem.as_str()))
            .map_err(|e| KeyEncodingError::Pem(e.to_string()))
    }

    /// The public half.
    pub fn public_key(&self) -> &CredentialPublicKey {
        &self.public
    }

    /// Sign `SHA-256(message)` with PKCS#1 v1.5 padding.
    ///
    /// Deterministic: the same key and message always give the same
    /// signature.
    pub fn sign(&self, message: &PackedMessage) -> Result<CredentialSignature, SigningError> {
        let modulus_len = self.public.size();
        if modulus_len < MIN_MODULUS_LEN {
            return Err(SigningError::DigestTooLarge {
                required: MIN_MODULUS_LEN,
                modulus_len,
            });
        }
        let digest = message_digest(message.as_bytes());
        let signature = self
            .private
            .sign_with_rng(
                &mut rand::rngs::OsRng,
                Pkcs1v15Sign::new::<Sha256>(),
                &digest,
            )
            .map_err(|e| match e {
                rsa::Error::MessageTooLong => SigningError::DigestTooLarge {
                    required: MIN_MODULUS_LEN,
                    modulus_len,
                },
                other => SigningError::Primitive(other.to_string()),
            })?;
        Ok(CredentialSignature(signature))
    }
}

impl std::fmt::Debug for CredentialKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialKeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a PKCS#1 v1.5 / SHA-256 signature over `message`.
///
/// `message` is raw bytes so that altered encodings can be checked too.
/// Any mismatch (length, range, padding, digest) yields `Ok(false)`.
pub fn verify(
    message: &[u8],
    signature: &CredentialSignature,
    public_key: &CredentialPublicKey,
) -> Result<bool, VerificationError> {
    let modulus_len = public_key.size();
    if modulus_len < MIN_MODULUS_LEN {
        return Err(VerificationError::ModulusTooSmall {
            required: MIN_MODULUS_LEN,
            modulus_len,
        });
    }
    let digest = message_digest(message);
    match public_key
        .inner
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature.as_bytes())
    {
        Ok(()) => Ok(true),
        Err(rsa::Error::Verification) => Ok(false),
        Err(e) => Err(VerificationError::InvalidPublicKey(e.to_string())),
    }
}

/// Convenience verification from a hex modulus and hex signature, as they
/// appear in an emitted vector.
pub fn verify_hex(
    message: &[u8],
    signature_hex: &str,
    modulus_hex: &str,
) -> Result<bool, VerificationError> {
    let key = CredentialPublicKey::from_hex(modulus_hex)?;
    let signature = CredentialSignature::from_hex(signature_hex)?;
    verify(message, &signature, &key)
}

// ---------------------------------------------------------------------------
// Byte helpers
// ---------------------------------------------------------------------------

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}

fn hex_prefix(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(4)])
}
