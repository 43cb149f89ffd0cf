use crate::{
    circuits::{
        bytes::{alloc_bytes, byte_nums},
        containment::{ContainmentAssertion, WeightedSumContainment},
        digest::{alloc_public_digest, enforce_digest, DigestGadget, Sha256Digest},
        window::{OneHotWindowSelector, WindowSelector},
    },
    config::{CircuitShape, DIGEST_LEN},
    error::{InclusionError, Result},
    witness::InclusionWitness,
    Scalar, E,
};
use bellpepper_core::{num::AllocatedNum, ConstraintSystem, SynthesisError};
use ff::PrimeField;
use spartan2::traits::circuit::SpartanCircuit;
use tracing::debug;

/// The gadgets an inclusion circuit is assembled from.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gadgets<D = Sha256Digest, W = OneHotWindowSelector, A = WeightedSumContainment> {
    pub digest: D,
    pub selector: W,
    pub containment: A,
}

/// Proves knowledge of a token and a claimed identity matching two public
/// SHA-256 digests, with the identity occurring in the token at a private offset.
///
/// Public inputs, in order: 32 token digest bytes, 32 identity digest bytes.
/// Private inputs: the token (N bytes), the identity (M bytes) and the offset.
#[derive(Debug, Clone)]
pub struct InclusionCircuit<D = Sha256Digest, W = OneHotWindowSelector, A = WeightedSumContainment>
{
    shape: CircuitShape,
    witness: Option<InclusionWitness>,
    gadgets: Gadgets<D, W, A>,
}

impl InclusionCircuit {
    /// A circuit with no assignment, enough to derive the constraint shape.
    pub fn new(shape: CircuitShape) -> Self {
        Self::with_gadgets(shape, Gadgets::default())
    }

    /// A circuit whose shape is taken from `witness`.
    pub fn for_witness(witness: InclusionWitness) -> Result<Self> {
        let shape = CircuitShape::new(witness.token.len(), witness.claimed_identity.len())?;
        Self::new(shape).assign(witness)
    }
}

impl<D, W, A> InclusionCircuit<D, W, A>
where
    D: DigestGadget,
    W: WindowSelector,
    A: ContainmentAssertion,
{
    pub fn with_gadgets(shape: CircuitShape, gadgets: Gadgets<D, W, A>) -> Self {
        Self {
            shape,
            witness: None,
            gadgets,
        }
    }

    /// Attach a witness. Fails if its lengths differ from the circuit shape.
    pub fn assign(mut self, witness: InclusionWitness) -> Result<Self> {
        self.shape.ensure_matches(witness.shape())?;
        self.witness = Some(witness);
        Ok(self)
    }

    /// Swap the containment assertion, keeping shape, witness and the other gadgets.
    pub fn with_containment<A2: ContainmentAssertion>(
        self,
        containment: A2,
    ) -> InclusionCircuit<D, W, A2> {
        InclusionCircuit {
            shape: self.shape,
            witness: self.witness,
            gadgets: Gadgets {
                digest: self.gadgets.digest,
                selector: self.gadgets.selector,
                containment,
            },
        }
    }

    pub fn shape(&self) -> CircuitShape {
        self.shape
    }

    /// Public input values in allocation order; zeros when no witness is attached.
    pub fn public_scalars<F: PrimeField>(&self) -> Vec<F> {
        match &self.witness {
            Some(witness) => witness.public_inputs().to_scalars(),
            None => vec![F::ZERO; 2 * DIGEST_LEN],
        }
    }

    /// Define every constraint of the relation in `cs`.
    ///
    /// Only structural failures are reported here. Whether an assignment
    /// satisfies the constraints is decided by whoever evaluates `cs`.
    pub fn define<F, CS>(&self, cs: &mut CS) -> Result<()>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        let CircuitShape {
            token_len,
            identity_len,
        } = self.shape;
        let witness = self.witness.as_ref();
        debug!(
            token_len,
            identity_len,
            offsets = self.shape.offset_count(),
            "defining inclusion constraints"
        );

        let token_digest = alloc_public_digest(
            cs.namespace(|| "token digest"),
            witness.map(|w| &w.token_digest),
        )?;
        let identity_digest = alloc_public_digest(
            cs.namespace(|| "claimed identity digest"),
            witness.map(|w| &w.claimed_identity_digest),
        )?;

        let token = alloc_bytes(
            cs.namespace(|| "token"),
            token_len,
            witness.map(|w| w.token.as_slice()),
        )?;
        let identity = alloc_bytes(
            cs.namespace(|| "claimed identity"),
            identity_len,
            witness.map(|w| w.claimed_identity.as_slice()),
        )?;
        let offset = AllocatedNum::alloc(cs.namespace(|| "identity offset"), || {
            witness
                .map(|w| F::from(w.identity_offset))
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        enforce_digest(
            cs.namespace(|| "token digest check"),
            &self.gadgets.digest,
            &token,
            &token_digest,
        )?;
        enforce_digest(
            cs.namespace(|| "claimed identity digest check"),
            &self.gadgets.digest,
            &identity,
            &identity_digest,
        )?;

        if !self.shape.has_inclusion_check() {
            debug!("empty token or identity, skipping inclusion check");
            return Ok(());
        }

        let source = byte_nums::<F, CS>(&token);
        let claimed = byte_nums::<F, CS>(&identity);

        let selector = &self.gadgets.selector;
        let window = selector
            .select(
                cs.namespace(|| "identity window"),
                &source,
                &offset,
                identity_len,
            )
            .map_err(|err| InclusionError::GadgetConstruction {
                gadget: selector.name(),
                source: err,
            })?;

        let containment = &self.gadgets.containment;
        containment
            .assert_contained(
                cs.namespace(|| "identity containment"),
                &window,
                &source,
                &claimed,
            )
            .map_err(|err| InclusionError::GadgetConstruction {
                gadget: containment.name(),
                source: err,
            })?;

        debug!(
            selector = selector.name(),
            containment = containment.name(),
            "inclusion check constrained"
        );
        Ok(())
    }
}

impl<D, W, A> SpartanCircuit<E> for InclusionCircuit<D, W, A>
where
    D: DigestGadget,
    W: WindowSelector,
    A: ContainmentAssertion,
{
    fn synthesize<CS: ConstraintSystem<Scalar>>(
        &self,
        cs: &mut CS,
        _: &[AllocatedNum<Scalar>],
        _: &[AllocatedNum<Scalar>],
        _: Option<&[Scalar]>,
    ) -> std::result::Result<(), SynthesisError> {
        self.define(cs)?;
        Ok(())
    }

    fn public_values(&self) -> std::result::Result<Vec<Scalar>, SynthesisError> {
        Ok(self.public_scalars())
    }
    fn shared<CS: ConstraintSystem<Scalar>>(
        &self,
        _cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<Scalar>>, SynthesisError> {
        Ok(vec![])
    }
    fn precommitted<CS: ConstraintSystem<Scalar>>(
        &self,
        _cs: &mut CS,
        _shared: &[AllocatedNum<Scalar>],
    ) -> std::result::Result<Vec<AllocatedNum<Scalar>>, SynthesisError> {
        Ok(vec![])
    }
    fn num_challenges(&self) -> usize {
        0
    }
}
