use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InclusionError, Result};

/// Number of bytes in a SHA-256 digest; also the number of public inputs per digest.
pub const DIGEST_LEN: usize = 32;

pub const ARTIFACT_DIR: &str = "keys";
pub const INCLUSION_PROVING_KEY: &str = "keys/inclusion_proving.key";
pub const INCLUSION_VERIFYING_KEY: &str = "keys/inclusion_verifying.key";
pub const INCLUSION_PROOF: &str = "keys/inclusion_proof.bin";

/// Compile-time capacity of an inclusion circuit.
///
/// A compiled constraint system cannot change topology with its inputs, so the
/// token length `N` and identity length `M` are fixed per circuit and every
/// witness assigned to it must have exactly these lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitShape {
    pub token_len: usize,
    pub identity_len: usize,
}

impl CircuitShape {
    pub fn new(token_len: usize, identity_len: usize) -> Result<Self> {
        if identity_len > token_len {
            return Err(InclusionError::InvalidShape {
                token_len,
                identity_len,
            });
        }
        Ok(Self {
            token_len,
            identity_len,
        })
    }

    /// Whether the circuit carries the window selection and containment check.
    pub fn has_inclusion_check(&self) -> bool {
        self.token_len != 0 && self.identity_len != 0
    }

    /// Number of admissible identity offsets, `N - M + 1`; zero if `M > N`.
    pub fn offset_count(&self) -> usize {
        self.token_len
            .checked_sub(self.identity_len)
            .map_or(0, |starts| starts + 1)
    }

    pub fn ensure_matches(&self, actual: CircuitShape) -> Result<()> {
        if *self != actual {
            return Err(InclusionError::ShapeMismatch {
                expected: *self,
                actual,
            });
        }
        Ok(())
    }
}

/// Locations of the proving artifacts written by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub proving_key: PathBuf,
    pub verifying_key: PathBuf,
    pub proof: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            proving_key: dir.join("inclusion_proving.key"),
            verifying_key: dir.join("inclusion_verifying.key"),
            proof: dir.join("inclusion_proof.bin"),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            proving_key: PathBuf::from(INCLUSION_PROVING_KEY),
            verifying_key: PathBuf::from(INCLUSION_VERIFYING_KEY),
            proof: PathBuf::from(INCLUSION_PROOF),
        }
    }
}
