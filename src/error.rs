//! Error types for circuit construction, witness assignment and the proving driver.

use bellpepper_core::SynthesisError;
use spartan2::errors::SpartanError;
use thiserror::Error;
use tracing::error;

use crate::config::CircuitShape;

pub type Result<T> = std::result::Result<T, InclusionError>;

#[derive(Error, Debug)]
pub enum InclusionError {
    /// A gadget could not be synthesized into the constraint system.
    #[error("failed to construct {gadget} gadget: {source}")]
    GadgetConstruction {
        gadget: &'static str,
        #[source]
        source: SynthesisError,
    },

    /// The digest gadget did not produce a 32 byte output.
    #[error("{gadget} gadget produced {actual} output bytes, expected 32")]
    UnexpectedDigestLength { gadget: &'static str, actual: usize },

    /// Allocating circuit inputs failed.
    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("identity length {identity_len} exceeds token length {token_len}")]
    InvalidShape {
        token_len: usize,
        identity_len: usize,
    },

    /// Witness lengths do not match the compiled circuit shape.
    #[error("witness shape {actual:?} does not match circuit shape {expected:?}")]
    ShapeMismatch {
        expected: CircuitShape,
        actual: CircuitShape,
    },

    #[error("claimed identity does not occur in the token")]
    IdentityNotFound,

    #[error("failed to decode token input: {0}")]
    Decode(String),

    #[error("proving backend failed: {0:?}")]
    Backend(SpartanError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SpartanError> for InclusionError {
    fn from(err: SpartanError) -> Self {
        InclusionError::Backend(err)
    }
}

impl From<InclusionError> for SynthesisError {
    fn from(err: InclusionError) -> Self {
        match err {
            InclusionError::Synthesis(source) => source,
            InclusionError::GadgetConstruction { source, .. } => source,
            other => {
                error!(error = %other, "inclusion circuit construction aborted");
                SynthesisError::Unsatisfiable
            }
        }
    }
}
