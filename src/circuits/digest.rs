//! Digest gadgets and the wiring that binds a computed digest to public inputs.

use std::fmt::Debug;

use bellpepper::gadgets::sha256::sha256;
use bellpepper_core::{boolean::Boolean, num::AllocatedNum, ConstraintSystem, SynthesisError};
use ff::PrimeField;
use tracing::debug;

use crate::{
    circuits::bytes::AllocatedByte,
    config::DIGEST_LEN,
    error::{InclusionError, Result},
};

/// Constrains a byte sequence to its cryptographic digest.
pub trait DigestGadget: Debug + Clone + Send + Sync {
    fn name(&self) -> &'static str;

    fn digest<F, CS>(
        &self,
        cs: CS,
        input: &[AllocatedByte],
    ) -> std::result::Result<Vec<AllocatedByte>, SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>;
}

/// SHA-256 over bellpepper's boolean gadget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestGadget for Sha256Digest {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest<F, CS>(
        &self,
        cs: CS,
        input: &[AllocatedByte],
    ) -> std::result::Result<Vec<AllocatedByte>, SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        let bits: Vec<Boolean> = input
            .iter()
            .flat_map(|byte| byte.bits().iter().cloned())
            .collect();
        let out = sha256(cs, &bits)?;

        out.chunks(8)
            .map(|chunk| AllocatedByte::from_bits(chunk).ok_or(SynthesisError::Unsatisfiable))
            .collect()
    }
}

/// Allocate one public input per digest byte, in order.
pub fn alloc_public_digest<F, CS>(
    mut cs: CS,
    value: Option<&[u8; DIGEST_LEN]>,
) -> std::result::Result<Vec<AllocatedNum<F>>, SynthesisError>
where
    F: PrimeField,
    CS: ConstraintSystem<F>,
{
    (0..DIGEST_LEN)
        .map(|i| {
            AllocatedNum::alloc_input(cs.namespace(|| format!("digest byte {i}")), || {
                value
                    .map(|v| F::from(u64::from(v[i])))
                    .ok_or(SynthesisError::AssignmentMissing)
            })
        })
        .collect()
}

/// Hash `input` with `gadget` and assert every output byte equals the matching public byte.
pub fn enforce_digest<F, CS, D>(
    mut cs: CS,
    gadget: &D,
    input: &[AllocatedByte],
    expected: &[AllocatedNum<F>],
) -> Result<()>
where
    F: PrimeField,
    CS: ConstraintSystem<F>,
    D: DigestGadget,
{
    let out = gadget
        .digest(cs.namespace(|| gadget.name()), input)
        .map_err(|source| InclusionError::GadgetConstruction {
            gadget: gadget.name(),
            source,
        })?;
    if out.len() != DIGEST_LEN || expected.len() != DIGEST_LEN {
        return Err(InclusionError::UnexpectedDigestLength {
            gadget: gadget.name(),
            actual: out.len(),
        });
    }
    debug!(input_len = input.len(), gadget = gadget.name(), "digest constrained");

    for (i, (byte, public)) in out.iter().zip(expected).enumerate() {
        let num = byte.num::<F, CS>();
        cs.enforce(
            || format!("digest byte {i} matches public input"),
            |lc| lc + public.get_variable(),
            |lc| lc + CS::one(),
            |_| num.lc(F::ONE),
        );
    }
    Ok(())
}
