//! # Generate Subcommand
//!
//! Builds a signed vector batch from the configuration file (if any) plus
//! command-line overrides, and writes it to the output path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use keyring_vectors::GeneratorConfig;

use crate::FieldArgs;

/// Arguments for the `keyring generate` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Number of vectors to generate.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Output JSON file (replaced if it exists).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Generate vectors across all cores.
    #[arg(long)]
    pub parallel: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

impl GenerateArgs {
    /// Merge flags over a loaded configuration.
    pub fn resolve(&self, mut config: GeneratorConfig) -> Result<GeneratorConfig> {
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.parallel {
            config.parallel = true;
        }
        self.fields.apply(&mut config.fields)?;
        Ok(config)
    }
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = args.resolve(crate::load_config(config_path)?)?;
    let batch = keyring_vectors::run(&config).with_context(|| {
        format!(
            "failed to generate {} vectors into {}",
            config.count,
            config.output.display()
        )
    })?;

    println!(
        "OK: wrote {} vectors to {}",
        batch.len(),
        config.output.display()
    );
    Ok(0)
}
