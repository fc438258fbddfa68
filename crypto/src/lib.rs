//! Cryptographic primitives for the Volta protocol.
//!
//! Three independent concerns live here:
//!
//! - [`hash`] — Blake2b-256 digests for blocks, transactions and vote hashes.
//! - [`ecdsa`] — secp256k1 identity keys: transaction signing with recovery,
//!   address derivation, SEC1 key (un)marshalling.
//! - [`bls`] — BLS12-381 aggregate signatures (min_pk scheme) used by the
//!   pacemaker to form quorum certificates.
//!
//! [`combo`] glues the two key systems together into the `ecdsa:::bls`
//! combined public key string a candidate registers with.

pub mod bls;
pub mod combo;
pub mod ecdsa;
pub mod error;
pub mod hash;

pub use bls::{aggregate_signatures, BlsKeyPair, BlsPublicKey, BlsSignature};
pub use combo::CombinedPubKey;
pub use ecdsa::{derive_address, recover_signer, EcdsaKeyPair};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, hash_block, vote_hash};
