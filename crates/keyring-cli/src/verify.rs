//! # Verify Subcommand
//!
//! Re-checks every record in a batch file: re-encodes its fields, verifies
//! the signature against its own key, and compares the outcome with the
//! record's `expected` flag.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use keyring_vectors::{RecordOutcome, VectorBatch};

/// Arguments for the `keyring verify` subcommand.
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Batch JSON file to check.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the verify subcommand. Returns exit code 1 if any record
/// disagrees with its `expected` flag.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    cmd_verify(&args.file)
}

fn cmd_verify(path: &Path) -> Result<u8> {
    let batch = VectorBatch::read_from(path)
        .with_context(|| format!("failed to read batch {}", path.display()))?;
    let report = batch.verify_all();

    let mut failures = 0usize;
    for check in report.disagreements() {
        failures += 1;
        let observed = match &check.outcome {
            RecordOutcome::Valid => "valid".to_string(),
            RecordOutcome::Invalid => "invalid".to_string(),
            RecordOutcome::Malformed(reason) => format!("malformed ({reason})"),
        };
        println!(
            "FAIL: vector {}: expected {}, got {observed}",
            check.index,
            if check.expected { "valid" } else { "invalid" }
        );
    }

    if failures == 0 {
        println!(
            "OK: {} vectors match their expected outcome",
            report.total()
        );
        Ok(0)
    } else {
        println!("FAIL: {failures} of {} vectors disagree", report.total());
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyring_vectors::GeneratorConfig;

    fn write_batch(dir: &Path, count: usize) -> PathBuf {
        let output = dir.join("vectors.json");
        let config = GeneratorConfig {
            count,
            output: output.clone(),
            ..GeneratorConfig::default()
        };
        keyring_vectors::run(&config).unwrap();
        output
    }

    #[test]
    fn generated_batch_passes() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_batch(dir.path(), 2);
        assert_eq!(run_verify(&VerifyArgs { file }).unwrap(), 0);
    }

    #[test]
    fn tampered_batch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_batch(dir.path(), 2);
        let mut batch = VectorBatch::read_from(&file).unwrap();
        batch.vectors[1].backdoor.push_str("00");
        batch.write_to(&file).unwrap();
        assert_eq!(run_verify(&VerifyArgs { file }).unwrap(), 1);
    }

    #[test]
    fn tampered_but_expected_false_passes() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_batch(dir.path(), 1);
        let mut batch = VectorBatch::read_from(&file).unwrap();
        batch.vectors[0].valid_until += 1;
        batch.vectors[0].expected = false;
        batch.write_to(&file).unwrap();
        assert_eq!(run_verify(&VerifyArgs { file }).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = VerifyArgs {
            file: PathBuf::from("/nonexistent/vectors.json"),
        };
        assert!(run_verify(&args).is_err());
    }
}
