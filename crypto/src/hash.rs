//! Blake2b hashing for blocks, transactions and consensus votes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use volta_types::Hash;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a serialized block to produce its id.
pub fn hash_block(block_bytes: &[u8]) -> Hash {
    Hash::new(blake2b_256(block_bytes))
}

/// The message a committee member signs when voting for a proposal:
/// `Blake2b(height ∥ round ∥ block_id)`.
pub fn vote_hash(height: u64, round: u64, block_id: &Hash) -> Hash {
    Hash::new(blake2b_256_multi(&[
        &height.to_be_bytes(),
        &round.to_be_bytes(),
        block_id.as_bytes(),
    ]))
}
