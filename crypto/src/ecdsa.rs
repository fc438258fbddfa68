//! secp256k1 ECDSA identity keys.
//!
//! Every account and every committee member is identified by a secp256k1
//! key. Transactions carry a 65-byte recoverable signature over the signing
//! hash; the signer address is recovered rather than transmitted.

use crate::error::CryptoError;
use crate::hash::blake2b_256;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::FieldBytes;
use rand::rngs::OsRng;
use volta_types::{Address, Hash};

/// A secp256k1 signing/verifying key pair.
#[derive(Clone)]
pub struct EcdsaKeyPair {
    signing: SigningKey,
}

impl EcdsaKeyPair {
    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::random(&mut OsRng),
        }
    }

    /// Deterministic key pair from a 32-byte seed. Test helper; a seed of
    /// all zeroes is invalid and is mapped to 1.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut material = *seed;
        if material.iter().all(|&b| b == 0) {
            material[31] = 1;
        }
        let field_bytes = FieldBytes::from(material);
        let signing = SigningKey::from_bytes(&field_bytes)
            .unwrap_or_else(|_| SigningKey::random(&mut OsRng));
        Self { signing }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing.verifying_key()
    }

    /// The uncompressed SEC1 encoding (65 bytes, `0x04`-prefixed).
    pub fn public_bytes(&self) -> Vec<u8> {
        pubkey_to_bytes(&self.verifying_key())
    }

    /// The 20-byte address of this key.
    pub fn address(&self) -> Address {
        derive_address(&self.verifying_key())
    }

    /// Produce a 65-byte recoverable signature (`r ∥ s ∥ v`) over a 32-byte
    /// signing hash.
    pub fn sign_hash(&self, hash: &Hash) -> Result<[u8; 65], CryptoError> {
        let (sig, recid) = self
            .signing
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recid.to_byte();
        Ok(out)
    }
}

/// Serialize a verifying key to its uncompressed SEC1 form (65 bytes).
pub fn pubkey_to_bytes(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(false).as_bytes().to_vec()
}

/// Unmarshal an SEC1-encoded public key (compressed or uncompressed).
pub fn pubkey_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, CryptoError> {
    VerifyingKey::from_sec1_bytes(bytes).map_err(|e| CryptoError::BadPublicKey(e.to_string()))
}

/// Derive the 20-byte address of a public key: the last 20 bytes of the
/// Blake2b digest of the uncompressed point (without the `0x04` tag).
pub fn derive_address(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    let digest = blake2b_256(&encoded.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address::new(out)
}

/// Recover the signer address from a 65-byte recoverable signature.
pub fn recover_signer(hash: &Hash, signature: &[u8]) -> Result<Address, CryptoError> {
    if signature.len() != 65 {
        return Err(CryptoError::BadSignature(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }
    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| CryptoError::BadSignature(e.to_string()))?;
    let recid = RecoveryId::from_byte(signature[64])
        .ok_or_else(|| CryptoError::BadSignature("invalid recovery id".into()))?;
    let key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &sig, recid)
        .map_err(|e| CryptoError::BadSignature(e.to_string()))?;
    Ok(derive_address(&key))
}
