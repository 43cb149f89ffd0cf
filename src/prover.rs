use std::time::Instant;

use spartan2::{traits::snark::R1CSSNARKTrait, zk_spartan::R1CSSNARK};
use tracing::{info, warn};

use crate::{
    circuits::{
        ContainmentAssertion, DigestGadget, Gadgets, InclusionCircuit, OneHotWindowSelector,
        Sha256Digest, WeightedSumContainment, WindowSelector,
    },
    config::CircuitShape,
    error::Result,
    witness::{InclusionWitness, PublicInputs},
    Scalar, E,
};

pub type ProverKey = <R1CSSNARK<E> as R1CSSNARKTrait<E>>::ProverKey;
pub type VerifierKey = <R1CSSNARK<E> as R1CSSNARKTrait<E>>::VerifierKey;
pub type Proof = R1CSSNARK<E>;

/// The capabilities the inclusion relation needs from a proving system.
///
/// `verify` reports an unsatisfied relation as `Ok(false)`; errors are kept
/// for failures of the backend itself.
pub trait ProvingBackend {
    type Compiled;
    type ProvingKey;
    type VerifyingKey;
    type Proof;

    fn compile(&self, shape: CircuitShape) -> Result<Self::Compiled>;

    fn setup(&self, compiled: &Self::Compiled)
        -> Result<(Self::ProvingKey, Self::VerifyingKey)>;

    fn prove(
        &self,
        compiled: &Self::Compiled,
        pk: &Self::ProvingKey,
        witness: &InclusionWitness,
    ) -> Result<Self::Proof>;

    fn verify(
        &self,
        proof: &Self::Proof,
        vk: &Self::VerifyingKey,
        public: &PublicInputs,
    ) -> Result<bool>;
}

/// ZK-Spartan (Hyrax PCS over T256) as a [`ProvingBackend`].
#[derive(Debug, Clone, Default)]
pub struct SpartanBackend<D = Sha256Digest, W = OneHotWindowSelector, A = WeightedSumContainment> {
    gadgets: Gadgets<D, W, A>,
}

impl SpartanBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D, W, A> SpartanBackend<D, W, A>
where
    D: DigestGadget,
    W: WindowSelector,
    A: ContainmentAssertion,
{
    pub fn with_gadgets(gadgets: Gadgets<D, W, A>) -> Self {
        Self { gadgets }
    }
}

impl<D, W, A> ProvingBackend for SpartanBackend<D, W, A>
where
    D: DigestGadget,
    W: WindowSelector,
    A: ContainmentAssertion,
{
    type Compiled = InclusionCircuit<D, W, A>;
    type ProvingKey = ProverKey;
    type VerifyingKey = VerifierKey;
    type Proof = Proof;

    fn compile(&self, shape: CircuitShape) -> Result<Self::Compiled> {
        let shape = CircuitShape::new(shape.token_len, shape.identity_len)?;
        info!(
            token_len = shape.token_len,
            identity_len = shape.identity_len,
            "Compiled inclusion circuit"
        );
        Ok(InclusionCircuit::with_gadgets(shape, self.gadgets.clone()))
    }

    fn setup(&self, compiled: &Self::Compiled) -> Result<(ProverKey, VerifierKey)> {
        let t0 = Instant::now();
        let (pk, vk) = R1CSSNARK::<E>::setup(compiled.clone())?;
        let setup_ms = t0.elapsed().as_millis();
        info!(elapsed_ms = setup_ms, "ZK-Spartan setup");
        Ok((pk, vk))
    }

    fn prove(
        &self,
        compiled: &Self::Compiled,
        pk: &ProverKey,
        witness: &InclusionWitness,
    ) -> Result<Proof> {
        let circuit = compiled.clone().assign(witness.clone())?;

        let t0 = Instant::now();
        let mut prep_snark = R1CSSNARK::<E>::prep_prove(pk, circuit.clone(), false)?;
        let prep_ms = t0.elapsed().as_millis();
        info!(elapsed_ms = prep_ms, "ZK-Spartan prep_prove");

        let t0 = Instant::now();
        let proof = R1CSSNARK::<E>::prove(pk, circuit, &mut prep_snark, false)?;
        let prove_ms = t0.elapsed().as_millis();
        info!(elapsed_ms = prove_ms, "ZK-Spartan prove");

        Ok(proof)
    }

    fn verify(&self, proof: &Proof, vk: &VerifierKey, public: &PublicInputs) -> Result<bool> {
        let t0 = Instant::now();
        let outcome = proof.verify(vk);
        let verify_ms = t0.elapsed().as_millis();

        match outcome {
            Ok(public_values) => {
                if public_values != public.to_scalars::<Scalar>() {
                    warn!("Proof was produced for different public inputs");
                    return Ok(false);
                }
                info!(elapsed_ms = verify_ms, "ZK-Spartan verify");
                Ok(true)
            }
            Err(err) => {
                warn!(error = ?err, elapsed_ms = verify_ms, "Proof rejected");
                Ok(false)
            }
        }
    }
}

/// Setup, prove and verify a single witness against a freshly compiled circuit.
pub fn run_circuit<B: ProvingBackend>(backend: &B, witness: &InclusionWitness) -> Result<bool> {
    let t0 = Instant::now();
    let compiled = backend.compile(witness.shape())?;
    let (pk, vk) = backend.setup(&compiled)?;
    let setup_ms = t0.elapsed().as_millis();

    let t0 = Instant::now();
    let proof = backend.prove(&compiled, &pk, witness)?;
    let prove_ms = t0.elapsed().as_millis();

    let t0 = Instant::now();
    let verified = backend.verify(&proof, &vk, &witness.public_inputs())?;
    let verify_ms = t0.elapsed().as_millis();

    info!(
        "Inclusion SUMMARY , setup={} ms, prove={} ms, verify={} ms, verified={}",
        setup_ms, prove_ms, verify_ms, verified
    );
    Ok(verified)
}
