//! Constraint definitions for the token/identity inclusion relation.

pub mod bytes;
pub mod containment;
pub mod digest;
pub mod inclusion_circuit;
pub mod window;

pub use bytes::AllocatedByte;
pub use containment::{ContainmentAssertion, PerByteContainment, WeightedSumContainment};
pub use digest::{DigestGadget, Sha256Digest};
pub use inclusion_circuit::{Gadgets, InclusionCircuit};
pub use window::{OneHotWindowSelector, Window, WindowSelector};
