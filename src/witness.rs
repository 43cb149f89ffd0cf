//! Witness assignment for the inclusion circuit and the JSON input format it is built from.

use std::{fs::File, io::BufReader, path::Path};

use ff::PrimeField;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::{CircuitShape, DIGEST_LEN},
    error::{InclusionError, Result},
    utils::{bytes_to_scalars, compact_token_payload, find_subsequence, sha256_bytes},
};

/// Values disclosed to the verifier, in public-input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    pub token_digest: [u8; DIGEST_LEN],
    pub claimed_identity_digest: [u8; DIGEST_LEN],
}

impl PublicInputs {
    pub fn to_scalars<F: PrimeField>(&self) -> Vec<F> {
        let mut scalars = bytes_to_scalars(&self.token_digest);
        scalars.extend(bytes_to_scalars::<F>(&self.claimed_identity_digest));
        scalars
    }
}

/// A complete assignment for one proof.
///
/// Fields are public so a caller can assemble any assignment, including ones
/// that do not satisfy the relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionWitness {
    pub token: Vec<u8>,
    pub claimed_identity: Vec<u8>,
    pub identity_offset: u64,
    pub token_digest: [u8; DIGEST_LEN],
    pub claimed_identity_digest: [u8; DIGEST_LEN],
}

impl InclusionWitness {
    /// Build a witness with an explicit offset, digesting both byte strings natively.
    pub fn new(token: Vec<u8>, claimed_identity: Vec<u8>, identity_offset: u64) -> Self {
        let token_digest = sha256_bytes(&token);
        let claimed_identity_digest = sha256_bytes(&claimed_identity);
        Self {
            token,
            claimed_identity,
            identity_offset,
            token_digest,
            claimed_identity_digest,
        }
    }

    /// Build a witness, locating the first occurrence of the identity in the token.
    pub fn from_token(token: Vec<u8>, claimed_identity: Vec<u8>) -> Result<Self> {
        let offset =
            find_subsequence(&token, &claimed_identity).ok_or(InclusionError::IdentityNotFound)?;
        Ok(Self::new(token, claimed_identity, offset as u64))
    }

    pub fn shape(&self) -> CircuitShape {
        CircuitShape {
            token_len: self.token.len(),
            identity_len: self.claimed_identity.len(),
        }
    }

    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs {
            token_digest: self.token_digest,
            claimed_identity_digest: self.claimed_identity_digest,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenEncoding {
    /// The token string is used byte for byte.
    #[default]
    Raw,
    /// The token is a compact `header.payload.signature` string; its decoded payload is used.
    CompactJwt,
}

/// Prover input as read from a JSON file.
///
/// ```json
/// { "token": "{\"sub\":\"twitter|337834122\"}", "claimedIdentity": "twitter|337834122" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionInput {
    pub token: String,
    pub claimed_identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_offset: Option<u64>,
    #[serde(default)]
    pub token_encoding: TokenEncoding,
}

impl InclusionInput {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading inclusion inputs from {}", path.display());
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn token_bytes(&self) -> Result<Vec<u8>> {
        match self.token_encoding {
            TokenEncoding::Raw => Ok(self.token.as_bytes().to_vec()),
            TokenEncoding::CompactJwt => compact_token_payload(&self.token),
        }
    }

    pub fn into_witness(self) -> Result<InclusionWitness> {
        let token = self.token_bytes()?;
        let identity = self.claimed_identity.into_bytes();
        match self.identity_offset {
            Some(offset) => Ok(InclusionWitness::new(token, identity, offset)),
            None => InclusionWitness::from_token(token, identity),
        }
    }
}
