//! Zero-knowledge proof that a claimed identity occurs inside a token
//!
//! The circuit proves, without revealing either string, that the prover knows
//! - a token whose SHA-256 digest equals a public value,
//! - a claimed identity whose SHA-256 digest equals a second public value,
//! - an offset at which the identity occurs verbatim inside the token.
//!
//! Proofs are produced with Spartan2's ZK-SNARK over the Hyrax polynomial commitment scheme.

use spartan2::{provider::T256HyraxEngine, traits::Engine};

pub type E = T256HyraxEngine;
pub type Scalar = <E as Engine>::Scalar;

pub mod circuits;
pub mod config;
pub mod error;
pub mod prover;
pub mod setup;
pub mod utils;
pub mod witness;

// Re-export commonly used types and functions
pub use circuits::{
    ContainmentAssertion, DigestGadget, Gadgets, InclusionCircuit, OneHotWindowSelector,
    PerByteContainment, Sha256Digest, WeightedSumContainment, WindowSelector,
};
pub use config::{ArtifactPaths, CircuitShape, DIGEST_LEN};
pub use error::{InclusionError, Result};
pub use prover::{run_circuit, Proof, ProverKey, ProvingBackend, SpartanBackend, VerifierKey};
pub use setup::{load_proof, load_proving_key, load_verifying_key, save_keys, save_proof};
pub use witness::{InclusionInput, InclusionWitness, PublicInputs, TokenEncoding};
