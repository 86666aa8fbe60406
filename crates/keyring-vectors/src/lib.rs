//! # keyring-vectors — Credential Test-Vector Batches
//!
//! Drives the end-to-end fixture pipeline for Keyring credentials:
//!
//! 1. [`GeneratorConfig`] supplies the field values, vector count and
//!    output path (defaults reproduce the reference credential).
//! 2. [`VectorBatchGenerator`] runs `count` independent iterations of
//!    keygen, encode, sign and self-verify.
//! 3. [`VectorBatch`] is written once, atomically, as
//!    `{"vectors": [...]}`.
//! 4. [`VectorBatch::verify_all`] re-checks any batch file, including
//!    hand-edited records marked `expected: false`.
//!
//! Nothing runs at load time; [`run`] is the explicit entry point.
//!
//! ## Crate Policy
//!
//! - Depends on `keyring-core` and `keyring-crypto` internally.
//! - A batch is all-or-nothing: any per-vector failure aborts the run
//!   before the output file is touched.

use keyring_crypto::{CredentialKeyPair, KeyGenerationError};

pub mod batch;
pub mod config;
pub mod error;
pub mod generator;
pub mod json_integer;
pub mod record;

pub use batch::{BatchReport, RecordCheck, VectorBatch};
pub use config::{FieldsConfig, GeneratorConfig};
pub use error::{ConfigError, VectorError};
pub use generator::{KeySource, VectorBatchGenerator};
pub use record::{CredentialSubmission, RecordOutcome, SignedVector};

/// Generate a batch from `config` and write it to `config.output`.
///
/// Returns the batch that was written.
pub fn run(config: &GeneratorConfig) -> Result<VectorBatch, VectorError> {
    run_with_keys(config, |_| CredentialKeyPair::generate())
}

/// [`run`] with keys taken from `keys` instead of the OS RNG.
pub fn run_with_keys<F>(config: &GeneratorConfig, keys: F) -> Result<VectorBatch, VectorError>
where
    F: Fn(usize) -> Result<CredentialKeyPair, KeyGenerationError> + Send + Sync + 'static,
{
    let fields = config.credential_fields()?;
    let batch = VectorBatchGenerator::new(fields)
        .parallel(config.parallel)
        .with_key_source(keys)
        .generate_batch(config.count)?;
    batch.write_to(&config.output)?;
    Ok(batch)
}
