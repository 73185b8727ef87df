use blake3::Hasher;

const SEED_SEPARATOR: &[u8] = b"::";

#[inline]
fn truncate_to_u64(hash: &blake3::Hash) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// 64-bit hash of `data`: the first 8 bytes of its BLAKE3 digest, little endian.
///
/// Stable across runs, processes and platforms. Not for security use.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    truncate_to_u64(&blake3::hash(data))
}

/// Seed for the synthetic per-match statistics, `hash("{request_id}::{seller_id}")`.
#[inline]
pub fn match_seed(request_id: &str, seller_id: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(request_id.as_bytes());
    hasher.update(SEED_SEPARATOR);
    hasher.update(seller_id.as_bytes());
    truncate_to_u64(&hasher.finalize())
}
