//! # keyring CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keyring_cli::encode::{run_encode, EncodeArgs};
use keyring_cli::generate::{run_generate, GenerateArgs};
use keyring_cli::verify::{run_verify, VerifyArgs};

/// Keyring credential test-vector tool.
///
/// Generates RSA exponent-3 signed credential vectors, re-verifies batch
/// files, and prints packed credential encodings.
#[derive(Parser, Debug)]
#[command(name = "keyring", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML generator configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a batch of signed vectors and write it as JSON.
    Generate(GenerateArgs),

    /// Re-verify every vector in a batch file.
    Verify(VerifyArgs),

    /// Print the packed message for the configured fields.
    Encode(EncodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the -v count when set.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("keyring CLI starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Generate(args) => run_generate(args, config),
        Commands::Verify(args) => run_verify(args),
        Commands::Encode(args) => run_encode(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
