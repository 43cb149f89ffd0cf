use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use ff::PrimeField;
use sha2::{Digest, Sha256};

use crate::{
    config::DIGEST_LEN,
    error::{InclusionError, Result},
};

/// Native SHA-256, used to build public inputs for a witness.
pub fn sha256_bytes(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Index of the first occurrence of `needle` in `haystack`.
///
/// An empty needle is found at offset 0.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// One field element per byte.
pub fn bytes_to_scalars<F: PrimeField>(bytes: &[u8]) -> Vec<F> {
    bytes.iter().map(|b| F::from(u64::from(*b))).collect()
}

/// Decode base64 in any of the url-safe or standard alphabets, with or without padding.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    if encoded.len() % 4 == 1 {
        return Err(InclusionError::Decode(format!(
            "invalid base64 length {}",
            encoded.len()
        )));
    }

    let mut candidates = vec![encoded.to_string()];

    let mut padded = encoded.to_string();
    match encoded.len() % 4 {
        2 => padded.push_str("=="),
        3 => padded.push('='),
        _ => {}
    }

    if padded != encoded {
        candidates.push(padded);
    }

    for candidate in candidates {
        if let Ok(decoded) = URL_SAFE_NO_PAD.decode(candidate.as_bytes()) {
            return Ok(decoded);
        }
        if let Ok(decoded) = URL_SAFE.decode(candidate.as_bytes()) {
            return Ok(decoded);
        }
        if let Ok(decoded) = STANDARD.decode(candidate.as_bytes()) {
            return Ok(decoded);
        }
    }

    Err(InclusionError::Decode("not valid base64".to_string()))
}

/// Decoded payload segment of a compact `header.payload.signature` token.
///
/// Only the encoding is undone; claims and signature are not inspected.
pub fn compact_token_payload(compact: &str) -> Result<Vec<u8>> {
    let mut parts = compact.trim().split('.');
    match (parts.next(), parts.next()) {
        (Some(_), Some(payload)) if !payload.is_empty() => decode_base64(payload),
        _ => Err(InclusionError::Decode(
            "compact token has no payload segment".to_string(),
        )),
    }
}
