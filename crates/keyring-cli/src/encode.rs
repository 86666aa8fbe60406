//! # Encode Subcommand
//!
//! Prints the packed message for the configured fields without generating
//! any keys, for checking a verifier's reconstruction by hand.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use keyring_core::PackedMessage;

use crate::FieldArgs;

/// Arguments for the `keyring encode` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Print a JSON object instead of plain text.
    #[arg(long)]
    pub json: bool,
}

/// Build the packed message from config plus flags.
pub fn encoded_message(args: &EncodeArgs, config_path: Option<&Path>) -> Result<PackedMessage> {
    let mut config = crate::load_config(config_path)?;
    args.fields.apply(&mut config.fields)?;
    let fields = config
        .credential_fields()
        .context("credential fields do not encode")?;
    Ok(PackedMessage::encode(&fields))
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs, config_path: Option<&Path>) -> Result<u8> {
    let message = encoded_message(args, config_path)?;
    if args.json {
        let out = serde_json::json!({
            "encodedMessage": message.to_hex(),
            "length": message.len(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Encoded Message: {}", message.to_hex());
        println!("Length: {} bytes", message.len());
    }
    Ok(0)
}
