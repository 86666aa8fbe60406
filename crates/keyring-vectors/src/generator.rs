//! # Batch Generator
//!
//! Produces "same plaintext, many keys" batches. Each iteration generates
//! a fresh exponent-3 keypair, packs the configured fields, signs, and
//! verifies its own signature before the record is accepted. Every record
//! is emitted with `expected: true`, so a self-verification failure is a
//! generator bug and aborts the batch.
//!
//! ## Ordering
//!
//! Iterations share no mutable state. With `parallel` enabled they run on
//! the rayon pool, and results are collected by iteration index, so the
//! batch order is always generation order.
//!
//! ## Key Source
//!
//! Keys come from a [`KeySource`] called once per iteration index. The
//! default draws a fresh key from the OS RNG. A seeded source makes a batch
//! reproducible.

use std::sync::Arc;

use keyring_core::{CredentialFields, PackedMessage};
use keyring_crypto::{verify, CredentialKeyPair, KeyGenerationError};
use rayon::prelude::*;

use crate::batch::VectorBatch;
use crate::error::VectorError;
use crate::record::SignedVector;

/// Produces the keypair for one iteration index.
pub type KeySource =
    Arc<dyn Fn(usize) -> Result<CredentialKeyPair, KeyGenerationError> + Send + Sync>;

/// Generates batches of signed vectors over one fixed set of fields.
#[derive(Clone)]
pub struct VectorBatchGenerator {
    fields: CredentialFields,
    parallel: bool,
    keys: KeySource,
}

impl VectorBatchGenerator {
    pub fn new(fields: CredentialFields) -> Self {
        Self {
            fields,
            parallel: false,
            keys: Arc::new(|_| CredentialKeyPair::generate()),
        }
    }

    /// Replace the per-iteration key source.
    pub fn with_key_source<F>(mut self, keys: F) -> Self
    where
        F: Fn(usize) -> Result<CredentialKeyPair, KeyGenerationError> + Send + Sync + 'static,
    {
        self.keys = Arc::new(keys);
        self
    }

    /// Run iterations on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn fields(&self) -> &CredentialFields {
        &self.fields
    }

    /// Generate one vector with the key source's keypair for `index`.
    pub fn generate_one(&self, index: usize) -> Result<SignedVector, VectorError> {
        let keypair = (self.keys)(index)
            .map_err(|source| VectorError::KeyGeneration { index, source })?;
        self.sign_with(index, &keypair)
    }

    /// Encode, sign and self-verify with the given keypair.
    pub fn sign_with(
        &self,
        index: usize,
        keypair: &CredentialKeyPair,
    ) -> Result<SignedVector, VectorError> {
        let message = PackedMessage::encode(&self.fields);
        let signature = keypair
            .sign(&message)
            .map_err(|source| VectorError::Signing { index, source })?;

        let verified = verify(message.as_bytes(), &signature, keypair.public_key())
            .map_err(|source| VectorError::Verification { index, source })?;
        if !verified {
            tracing::error!(index, "self-verification failed");
            return Err(VectorError::SelfVerificationFailed { index });
        }

        tracing::debug!(
            index,
            key = %keypair.public_key(),
            "generated vector"
        );
        Ok(SignedVector::new(
            &self.fields,
            keypair.public_key(),
            &signature,
            true,
        ))
    }

    /// Generate `count` independent vectors in generation order.
    pub fn generate_batch(&self, count: usize) -> Result<VectorBatch, VectorError> {
        if count == 0 {
            return Err(VectorError::EmptyBatch);
        }
        tracing::info!(count, parallel = self.parallel, "generating vector batch");

        let vectors = if self.parallel {
            (0..count)
                .into_par_iter()
                .map(|index| self.generate_one(index))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..count)
                .map(|index| self.generate_one(index))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(VectorBatch::new(vectors))
    }
}

impl std::fmt::Debug for VectorBatchGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorBatchGenerator")
            .field("fields", &self.fields)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generator() -> VectorBatchGenerator {
        VectorBatchGenerator::new(GeneratorConfig::default().credential_fields().unwrap())
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(matches!(
            generator().generate_batch(0),
            Err(VectorError::EmptyBatch)
        ));
    }

    #[test]
    fn small_batch_is_self_consistent() {
        let batch = generator().generate_batch(3).unwrap();
        assert_eq!(batch.len(), 3);
        for record in &batch {
            assert!(record.expected);
            assert!(record.check().is_valid());
        }
    }

    #[test]
    fn every_vector_uses_the_same_fields() {
        let batch = generator().generate_batch(2).unwrap();
        let first = batch.vectors[0].raw_fields().unwrap();
        assert_eq!(batch.vectors[1].raw_fields().unwrap(), first);
        assert_eq!(
            batch.vectors[0].encoded_message().unwrap(),
            batch.vectors[1].encoded_message().unwrap()
        );
    }

    #[test]
    fn keys_and_signatures_are_distinct() {
        let batch = generator().parallel(true).generate_batch(4).unwrap();
        let keys: HashSet<&str> = batch.iter().map(|v| v.key.as_str()).collect();
        let sigs: HashSet<&str> = batch.iter().map(|v| v.signature.as_str()).collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(sigs.len(), 4);
    }

    #[test]
    fn sign_with_given_key_records_that_key() {
        let kp = CredentialKeyPair::generate().unwrap();
        let record = generator().sign_with(7, &kp).unwrap();
        assert_eq!(record.key, kp.public_key().modulus_hex());
    }

    #[test]
    fn key_failure_reports_its_iteration() {
        for parallel in [false, true] {
            let err = generator()
                .parallel(parallel)
                .with_key_source(|index| {
                    if index == 2 {
                        Err(KeyGenerationError::Exhausted {
                            attempts: 1,
                            last_error: "injected".to_string(),
                        })
                    } else {
                        CredentialKeyPair::generate()
                    }
                })
                .generate_batch(4)
                .unwrap_err();
            assert_eq!(err.index(), Some(2));
            assert!(matches!(err, VectorError::KeyGeneration { index: 2, .. }));
        }
    }

    #[test]
    fn seeded_key_source_reproduces_the_batch() {
        let seeded = |index: usize| {
            CredentialKeyPair::generate_with_rng(&mut StdRng::seed_from_u64(index as u64))
        };
        let a = generator().with_key_source(seeded).generate_batch(2).unwrap();
        let b = generator()
            .parallel(true)
            .with_key_source(seeded)
            .generate_batch(2)
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a.vectors[0].key, a.vectors[1].key);
    }

    #[test]
    fn debug_omits_key_source() {
        let debug = format!("{:?}", generator());
        assert!(debug.starts_with("VectorBatchGenerator {"));
        assert!(debug.contains("parallel: false"));
    }
}
