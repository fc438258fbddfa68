//! BLS12-381 aggregate signatures (min_pk scheme).
//!
//! Committee members sign vote hashes with BLS so the round leader can
//! aggregate the shares into one 96-byte signature inside the quorum
//! certificate. Public keys live on G1 (48 bytes), signatures on G2.

use crate::error::CryptoError;
use blst::min_pk::{AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;

/// Domain separation tag for all Volta consensus signatures.
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// A BLS public key (48-byte compressed G1 point).
#[derive(Clone)]
pub struct BlsPublicKey(PublicKey);

impl BlsPublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::BadPublicKey(format!("bls G1 point: {e:?}")))
    }

    pub fn to_bytes(&self) -> [u8; 48] {
        self.0.to_bytes()
    }
}

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

impl std::fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsPublicKey({}..)", hex::encode(&self.to_bytes()[..4]))
    }
}

/// A BLS signature (96-byte compressed G2 point).
#[derive(Clone)]
pub struct BlsSignature(Signature);

impl BlsSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Signature::from_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::BadSignature(format!("bls G2 point: {e:?}")))
    }

    pub fn to_bytes(&self) -> [u8; 96] {
        self.0.to_bytes()
    }

    /// Verify this signature over `message` with a single public key.
    pub fn verify(&self, message: &[u8], public_key: &BlsPublicKey) -> bool {
        self.0.verify(true, message, DST, &[], &public_key.0, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Verify this signature as an aggregate over per-signer messages.
    ///
    /// `pairs` holds one `(message, public key)` tuple per aggregated share,
    /// in the same order the shares were aggregated.
    pub fn aggregate_verify(&self, pairs: &[(&[u8], &BlsPublicKey)]) -> bool {
        if pairs.is_empty() {
            return false;
        }
        let msgs: Vec<&[u8]> = pairs.iter().map(|(m, _)| *m).collect();
        let pks: Vec<&PublicKey> = pairs.iter().map(|(_, pk)| &pk.0).collect();
        self.0.aggregate_verify(true, &msgs, DST, &pks, true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSignature({}..)", hex::encode(&self.to_bytes()[..4]))
    }
}

/// A BLS secret/public key pair.
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a fresh key pair from OS randomness.
    pub fn generate() -> Self {
        let mut ikm = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut ikm);
        Self::from_ikm(&ikm)
    }

    /// Deterministic key pair from 32 bytes of input key material.
    pub fn from_ikm(ikm: &[u8; 32]) -> Self {
        let secret = SecretKey::key_gen(ikm, &[]).expect("ikm is 32 bytes");
        let public = BlsPublicKey(secret.sk_to_pk());
        Self { secret, public }
    }

    pub fn public(&self) -> &BlsPublicKey {
        &self.public
    }

    /// Sign a message, producing one aggregatable share.
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, DST, &[]))
    }
}

/// Aggregate signature shares into a single signature.
pub fn aggregate_signatures(signatures: &[BlsSignature]) -> Result<BlsSignature, CryptoError> {
    if signatures.is_empty() {
        return Err(CryptoError::BadSignature("nothing to aggregate".into()));
    }
    let refs: Vec<&Signature> = signatures.iter().map(|s| &s.0).collect();
    let agg = AggregateSignature::aggregate(&refs, true)
        .map_err(|e| CryptoError::BadSignature(format!("aggregation: {e:?}")))?;
    Ok(BlsSignature(agg.to_signature()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(seed: u8) -> BlsKeyPair {
        BlsKeyPair::from_ikm(&[seed; 32])
    }

    #[test]
    fn sign_and_verify() {
        let kp = keypair(1);
        let sig = kp.sign(b"round 3 vote");
        assert!(sig.verify(b"round 3 vote", kp.public()));
        assert!(!sig.verify(b"round 4 vote", kp.public()));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = keypair(1);
        let kp2 = keypair(2);
        let sig = kp1.sign(b"msg");
        assert!(!sig.verify(b"msg", kp2.public()));
    }

    #[test]
    fn aggregate_over_same_message() {
        let kps: Vec<BlsKeyPair> = (1..=3).map(keypair).collect();
        let msg = b"block id at height 9";
        let shares: Vec<BlsSignature> = kps.iter().map(|k| k.sign(msg)).collect();
        let agg = aggregate_signatures(&shares).unwrap();

        let pairs: Vec<(&[u8], &BlsPublicKey)> =
            kps.iter().map(|k| (msg.as_slice(), k.public())).collect();
        assert!(agg.aggregate_verify(&pairs));
    }

    #[test]
    fn aggregate_over_distinct_messages() {
        let kps: Vec<BlsKeyPair> = (1..=3).map(keypair).collect();
        let msgs: Vec<Vec<u8>> = (0..3u8).map(|i| vec![i, i, i]).collect();
        let shares: Vec<BlsSignature> = kps
            .iter()
            .zip(&msgs)
            .map(|(k, m)| k.sign(m))
            .collect();
        let agg = aggregate_signatures(&shares).unwrap();

        let pairs: Vec<(&[u8], &BlsPublicKey)> = kps
            .iter()
            .zip(&msgs)
            .map(|(k, m)| (m.as_slice(), k.public()))
            .collect();
        assert!(agg.aggregate_verify(&pairs));
    }

    #[test]
    fn aggregate_detects_missing_share() {
        let kps: Vec<BlsKeyPair> = (1..=3).map(keypair).collect();
        let msg = b"quorum";
        let shares: Vec<BlsSignature> = kps[..2].iter().map(|k| k.sign(msg)).collect();
        let agg = aggregate_signatures(&shares).unwrap();

        // Claiming all three signed must fail.
        let pairs: Vec<(&[u8], &BlsPublicKey)> =
            kps.iter().map(|k| (msg.as_slice(), k.public())).collect();
        assert!(!agg.aggregate_verify(&pairs));
    }

    #[test]
    fn empty_aggregation_rejected() {
        assert!(aggregate_signatures(&[]).is_err());
    }

    #[test]
    fn key_bytes_roundtrip() {
        let kp = keypair(9);
        let restored = BlsPublicKey::from_bytes(&kp.public().to_bytes()).unwrap();
        assert_eq!(&restored, kp.public());
    }
}
