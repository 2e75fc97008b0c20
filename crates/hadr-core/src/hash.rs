use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::HadrError;
use crate::serde::to_canonical_json_bytes;

/// Computes a stable SHA256 hash of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, HadrError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
