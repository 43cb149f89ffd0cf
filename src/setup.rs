use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Cursor, Write},
    path::Path,
};

use memmap2::MmapOptions;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::{
    config::ArtifactPaths,
    error::Result,
    prover::{Proof, ProverKey, VerifierKey},
};

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let bytes = bincode::serialize(value)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

fn read_mapped<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    // SAFETY: artifacts are written once by `write_artifact` and not modified while mapped.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    Ok(bincode::deserialize_from(Cursor::new(&mmap[..]))?)
}

pub fn save_keys(paths: &ArtifactPaths, pk: &ProverKey, vk: &VerifierKey) -> Result<()> {
    write_artifact(&paths.proving_key, pk)?;
    info!("Saved ZK-Spartan proving key to: {}", paths.proving_key.display());

    write_artifact(&paths.verifying_key, vk)?;
    info!("Saved ZK-Spartan verifying key to: {}", paths.verifying_key.display());

    Ok(())
}

pub fn load_proving_key<P: AsRef<Path>>(pk_path: P) -> Result<ProverKey> {
    let pk_path = pk_path.as_ref();
    let pk = read_mapped(pk_path)?;
    info!("Loaded ZK-Spartan proving key from: {}", pk_path.display());
    Ok(pk)
}

pub fn load_verifying_key<P: AsRef<Path>>(vk_path: P) -> Result<VerifierKey> {
    let vk_path = vk_path.as_ref();
    let vk = read_mapped(vk_path)?;
    info!("Loaded ZK-Spartan verifying key from: {}", vk_path.display());
    Ok(vk)
}

pub fn save_proof<P: AsRef<Path>>(proof_path: P, proof: &Proof) -> Result<()> {
    let proof_path = proof_path.as_ref();
    write_artifact(proof_path, proof)?;
    info!("Saved ZK-Spartan proof to: {}", proof_path.display());
    Ok(())
}

pub fn load_proof<P: AsRef<Path>>(proof_path: P) -> Result<Proof> {
    let proof_path = proof_path.as_ref();
    let proof_file = File::open(proof_path)?;
    let proof: Proof = bincode::deserialize_from(&mut BufReader::new(proof_file))?;
    info!("Loaded ZK-Spartan proof from: {}", proof_path.display());
    Ok(proof)
}
