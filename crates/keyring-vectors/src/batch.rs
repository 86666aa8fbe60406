//! # Vector Batches
//!
//! A batch is the single JSON document `{"vectors": [...]}` holding every
//! record of one run in generation order. It is written exactly once,
//! after all vectors exist: the document goes to a uniquely named temp file
//! in the target's directory which is then persisted over the target, so a
//! failed run never leaves a partial file behind and an existing file is
//! replaced, not appended to.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::VectorError;
use crate::record::{RecordOutcome, SignedVector};

/// An ordered collection of signed vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorBatch {
    pub vectors: Vec<SignedVector>,
}

/// Outcome of re-checking one record against its `expected` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCheck {
    pub index: usize,
    pub expected: bool,
    pub outcome: RecordOutcome,
}

impl RecordCheck {
    /// Whether the observed outcome matches the record's `expected` flag.
    pub fn agrees(&self) -> bool {
        self.outcome.is_valid() == self.expected
    }
}

/// Result of re-verifying a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub checks: Vec<RecordCheck>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    /// Records whose outcome contradicts their `expected` flag.
    pub fn disagreements(&self) -> impl Iterator<Item = &RecordCheck> {
        self.checks.iter().filter(|c| !c.agrees())
    }

    pub fn first_disagreement(&self) -> Option<&RecordCheck> {
        self.disagreements().next()
    }

    pub fn all_agree(&self) -> bool {
        self.first_disagreement().is_none()
    }
}

impl VectorBatch {
    pub fn new(vectors: Vec<SignedVector>) -> Self {
        Self { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignedVector> {
        self.vectors.iter()
    }

    /// Re-encode and re-verify every record against its own key.
    pub fn verify_all(&self) -> BatchReport {
        let checks = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let outcome = record.check();
                if record.expected != outcome.is_valid() {
                    tracing::warn!(
                        index,
                        ?outcome,
                        expected = record.expected,
                        "record disagrees with expected flag"
                    );
                }
                RecordCheck {
                    index,
                    expected: record.expected,
                    outcome,
                }
            })
            .collect();
        BatchReport { checks }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the batch to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<(), VectorError> {
        let mut json = self.to_json_pretty().map_err(|source| VectorError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');

        // Dropping `temp` on an early return deletes it.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(io_error(path))?;
        temp.write_all(json.as_bytes()).map_err(io_error(temp.path()))?;
        temp.as_file().sync_all().map_err(io_error(temp.path()))?;
        temp.persist(path).map_err(|e| io_error(path)(e.error))?;

        tracing::info!(path = %path.display(), vectors = self.len(), "wrote vector batch");
        Ok(())
    }

    /// Load a batch from a JSON file.
    pub fn read_from(path: &Path) -> Result<Self, VectorError> {
        let content = std::fs::read_to_string(path).map_err(|source| VectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| VectorError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<'a> IntoIterator for &'a VectorBatch {
    type Item = &'a SignedVector;
    type IntoIter = std::slice::Iter<'a, SignedVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> VectorError {
    let path = path.to_path_buf();
    move |source| VectorError::Io { path, source }
}
