//! Deterministic seed derivation.
//!
//! Seeds are the first eight bytes of a SHA-256 digest over a domain tag and
//! the little-endian encoding of each input. Item and element seeds use
//! different tags so the two never collide for equal inputs.

use sha2::{Digest, Sha256};

const ITEM_DOMAIN: &[u8] = b"phoney.item.v1";
const ELEMENT_DOMAIN: &[u8] = b"phoney.element.v1";

pub fn derive_seed(domain: &[u8], parts: &[u64]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    for part in parts {
        hasher.update(part.to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Seed of the item at `item_index` in a batch seeded with `base_seed`.
pub fn item_seed(base_seed: u64, item_index: usize) -> u64 {
    derive_seed(ITEM_DOMAIN, &[base_seed, item_index as u64])
}

/// Seed of one element of an array placeholder.
pub fn element_seed(token_seed: u64, element_index: usize) -> u64 {
    derive_seed(ELEMENT_DOMAIN, &[token_seed, element_index as u64])
}
