//! # keyring-cli — Credential Vector Tooling
//!
//! Provides the `keyring` command-line interface over `keyring-vectors`.
//!
//! ## Subcommands
//!
//! - `keyring generate` — Generate a signed vector batch and write it.
//! - `keyring verify` — Re-verify every record in a batch file.
//! - `keyring encode` — Print the packed encoding of the configured fields.
//!
//! ```bash
//! keyring generate --count 100 --output test_vectors.json
//! keyring --config keyring.yaml generate --parallel
//! keyring verify test_vectors.json
//! keyring encode --policy-id 7 --backdoor-hex 0xdeadbeef
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to domain crates and return an exit code.

pub mod encode;
pub mod generate;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use keyring_core::cost::parse_decimal;
use keyring_vectors::{FieldsConfig, GeneratorConfig};

/// Load the configuration file if one was given, else the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Command-line overrides for the credential fields.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Trading address as 20-byte hex.
    #[arg(long)]
    pub trading_address: Option<String>,

    /// Policy id (24-bit).
    #[arg(long)]
    pub policy_id: Option<i64>,

    /// Create-before Unix timestamp (32-bit).
    #[arg(long)]
    pub create_before: Option<i64>,

    /// Valid-until Unix timestamp (32-bit).
    #[arg(long)]
    pub valid_until: Option<i64>,

    /// Cost as a decimal integer (160-bit).
    #[arg(long)]
    pub cost: Option<String>,

    /// Backdoor as UTF-8 text.
    #[arg(long, conflicts_with = "backdoor_hex")]
    pub backdoor: Option<String>,

    /// Backdoor as hex bytes.
    #[arg(long)]
    pub backdoor_hex: Option<String>,
}

impl FieldArgs {
    /// Apply every flag that was given on top of `fields`.
    pub fn apply(&self, fields: &mut FieldsConfig) -> Result<()> {
        if let Some(addr) = &self.trading_address {
            fields.trading_address = addr.clone();
        }
        if let Some(v) = self.policy_id {
            fields.policy_id = v;
        }
        if let Some(v) = self.create_before {
            fields.create_before = v;
        }
        if let Some(v) = self.valid_until {
            fields.valid_until = v;
        }
        if let Some(cost) = &self.cost {
            fields.cost = parse_decimal("cost", cost).context("invalid --cost")?;
        }
        if let Some(text) = &self.backdoor {
            fields.backdoor = Some(text.clone());
            fields.backdoor_hex = None;
        }
        if let Some(hex) = &self.backdoor_hex {
            fields.backdoor_hex = Some(hex.clone());
            fields.backdoor = None;
        }
        Ok(())
    }
}
