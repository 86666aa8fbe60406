//! # Generator Configuration
//!
//! YAML configuration for a batch run. Every key is optional; omitted keys
//! fall back to the reference credential and a batch of 100 vectors
//! written to `test_vectors.json`.
//!
//! ```yaml
//! fields:
//!   trading_address: "0x0123456789abcDEF0123456789abCDef01234567"
//!   policy_id: 123456
//!   create_before: 1625247600
//!   valid_until: 1627849600
//!   cost: "1000000000000000000"   # integer or decimal string
//!   backdoor: example_backdoor_data  # or backdoor_hex: "0x..."
//! count: 100
//! output: test_vectors.json
//! parallel: false
//! ```

use std::path::{Path, PathBuf};

use keyring_core::{hexstr, CredentialFields, RawCredentialFields};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, VectorError};

/// Reference trading address.
pub const DEFAULT_TRADING_ADDRESS: &str = "0x0123456789abcDEF0123456789abCDef01234567";
/// Reference policy id.
pub const DEFAULT_POLICY_ID: i64 = 123_456;
/// Reference create-before timestamp.
pub const DEFAULT_CREATE_BEFORE: i64 = 1_625_247_600;
/// Reference valid-until timestamp.
pub const DEFAULT_VALID_UNTIL: i64 = 1_627_849_600;
/// Reference cost (one token at 18 decimals).
pub const DEFAULT_COST: u64 = 1_000_000_000_000_000_000;
/// Reference backdoor text.
pub const DEFAULT_BACKDOOR: &str = "example_backdoor_data";
/// Reference batch size.
pub const DEFAULT_COUNT: usize = 100;
/// Reference output file.
pub const DEFAULT_OUTPUT: &str = "test_vectors.json";

/// A full batch-run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Credential field values, identical across every vector.
    pub fields: FieldsConfig,
    /// Number of vectors to generate.
    pub count: usize,
    /// Output path for the batch JSON document.
    pub output: PathBuf,
    /// Generate vectors on the rayon thread pool.
    pub parallel: bool,
}

/// Credential field values as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldsConfig {
    pub trading_address: String,
    pub policy_id: i64,
    pub create_before: i64,
    pub valid_until: i64,
    #[serde(with = "keyring_core::cost::serde_decimal")]
    pub cost: BigInt,
    /// Backdoor as UTF-8 text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdoor: Option<String>,
    /// Backdoor as hex bytes. Mutually exclusive with `backdoor`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdoor_hex: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fields: FieldsConfig::default(),
            count: DEFAULT_COUNT,
            output: PathBuf::from(DEFAULT_OUTPUT),
            parallel: false,
        }
    }
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            trading_address: DEFAULT_TRADING_ADDRESS.to_string(),
            policy_id: DEFAULT_POLICY_ID,
            create_before: DEFAULT_CREATE_BEFORE,
            valid_until: DEFAULT_VALID_UNTIL,
            cost: BigInt::from(DEFAULT_COST),
            backdoor: None,
            backdoor_hex: None,
        }
    }
}

impl FieldsConfig {
    /// Resolve the backdoor bytes from whichever key is set. Neither set
    /// means the reference backdoor.
    pub fn backdoor_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        match (&self.backdoor, &self.backdoor_hex) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingBackdoor),
            (Some(text), None) => Ok(text.as_bytes().to_vec()),
            (None, Some(hex)) => hexstr::decode_prefixed(hex).map_err(ConfigError::BackdoorHex),
            (None, None) => Ok(DEFAULT_BACKDOOR.as_bytes().to_vec()),
        }
    }

    /// Convert to unvalidated raw fields.
    pub fn to_raw(&self) -> Result<RawCredentialFields, ConfigError> {
        Ok(RawCredentialFields {
            trading_address: self.trading_address.clone(),
            policy_id: self.policy_id,
            create_before: self.create_before,
            valid_until: self.valid_until,
            cost: self.cost.clone(),
            backdoor: self.backdoor_bytes()?,
        })
    }
}

impl GeneratorConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::YamlParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let config = Self::from_yaml_str(&content, path)?;
        tracing::debug!(path = %path.display(), count = config.count, "loaded generator config");
        Ok(config)
    }

    /// Validate the configured fields against their packed widths.
    pub fn credential_fields(&self) -> Result<CredentialFields, VectorError> {
        let raw = self.fields.to_raw()?;
        Ok(raw.validate()?)
    }
}
