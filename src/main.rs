//! Runs the inclusion circuit end to end on a sample token.
//!
//! The token is an OpenID-style claim set and the claimed identity is its `sub`
//! value. Keys and the proof are written under `keys/`. Set `RUST_LOG=info`
//! to see per-phase timings.

use std::{process, time::Instant};

use inclusion_spartan2::{
    load_proof, save_keys, save_proof, ArtifactPaths, InclusionError, InclusionWitness,
    ProvingBackend, SpartanBackend,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const SAMPLE_TOKEN: &str = r#"{"iss":"https://dev-9h47ajc9.us.au111th0.com/","sub":"twitter|337834122","aud":"123","iat":1639173028,"exp":1639209028,"nonce":"44017a89"}"#;
const SAMPLE_IDENTITY: &str = "twitter|337834122";

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run_sample() {
        Ok(true) => info!("Verification successful!"),
        Ok(false) => {
            error!("Proof did not verify");
            process::exit(1);
        }
        Err(err) => {
            error!(error = %err, "Inclusion pipeline failed");
            process::exit(1);
        }
    }
}

fn run_sample() -> Result<bool, InclusionError> {
    let witness = InclusionWitness::from_token(
        SAMPLE_TOKEN.as_bytes().to_vec(),
        SAMPLE_IDENTITY.as_bytes().to_vec(),
    )?;
    info!(
        token_len = witness.token.len(),
        identity_len = witness.claimed_identity.len(),
        identity_offset = witness.identity_offset,
        "Built sample witness"
    );

    let backend = SpartanBackend::new();
    let paths = ArtifactPaths::default();

    let t0 = Instant::now();
    let compiled = backend.compile(witness.shape())?;
    let (pk, vk) = backend.setup(&compiled)?;
    let setup_ms = t0.elapsed().as_millis();
    save_keys(&paths, &pk, &vk)?;

    let t0 = Instant::now();
    let proof = backend.prove(&compiled, &pk, &witness)?;
    let prove_ms = t0.elapsed().as_millis();
    save_proof(&paths.proof, &proof)?;

    let proof = load_proof(&paths.proof)?;
    let t0 = Instant::now();
    let verified = backend.verify(&proof, &vk, &witness.public_inputs())?;
    let verify_ms = t0.elapsed().as_millis();

    info!(
        "ZK-Spartan SUMMARY , setup={} ms, prove={} ms, verify={} ms",
        setup_ms, prove_ms, verify_ms
    );
    Ok(verified)
}
