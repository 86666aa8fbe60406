//! Vector-generation error types.
//!
//! Every failure inside the per-vector loop carries the iteration `index`
//! at which the batch aborted. No partial batch is ever written.

use std::path::PathBuf;

use keyring_core::EncodingError;
use keyring_crypto::{KeyGenerationError, SigningError, VerificationError};
use thiserror::Error;

/// Errors that abort batch generation or batch I/O.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Fresh key generation failed for one iteration.
    #[error("vector {index}: key generation failed: {source}")]
    KeyGeneration {
        index: usize,
        source: KeyGenerationError,
    },

    /// Signing failed for one iteration.
    #[error("vector {index}: signing failed: {source}")]
    Signing { index: usize, source: SigningError },

    /// The freshly generated public key could not be used to verify.
    #[error("vector {index}: verification error: {source}")]
    Verification {
        index: usize,
        source: VerificationError,
    },

    /// A signature produced in this run did not verify against its own key.
    #[error("vector {index}: self-verification failed, refusing to emit an invalid vector")]
    SelfVerificationFailed { index: usize },

    /// A batch of zero vectors was requested.
    #[error("vector count must be positive")]
    EmptyBatch,

    /// The configured field values are out of range or malformed.
    #[error("invalid credential fields: {0}")]
    Fields(#[from] EncodingError),

    /// Loading the generator configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading or writing a batch file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A batch file could not be serialized or parsed.
    #[error("JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl VectorError {
    /// The iteration at which generation aborted, if the failure was
    /// inside the per-vector loop.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::KeyGeneration { index, .. }
            | Self::Signing { index, .. }
            | Self::Verification { index, .. }
            | Self::SelfVerificationFailed { index } => Some(*index),
            _ => None,
        }
    }
}

/// Errors raised while loading a [`GeneratorConfig`](crate::GeneratorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The configuration file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Both `backdoor` and `backdoor_hex` were set.
    #[error("set either `backdoor` or `backdoor_hex`, not both")]
    ConflictingBackdoor,

    /// `backdoor_hex` is not valid hex.
    #[error("invalid backdoor_hex: {0}")]
    BackdoorHex(EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_errors_report_index() {
        let err = VectorError::SelfVerificationFailed { index: 17 };
        assert_eq!(err.index(), Some(17));
        assert!(err.to_string().contains("vector 17"));

        let err = VectorError::Signing {
            index: 3,
            source: SigningError::DigestTooLarge {
                required: 62,
                modulus_len: 32,
            },
        };
        assert_eq!(err.index(), Some(3));
        assert!(err.to_string().starts_with("vector 3: signing failed"));
    }

    #[test]
    fn batch_level_errors_have_no_index() {
        assert_eq!(VectorError::EmptyBatch.index(), None);
        let err = VectorError::from(ConfigError::ConflictingBackdoor);
        assert_eq!(err.index(), None);
        assert!(err.to_string().contains("backdoor_hex"));
    }
}
