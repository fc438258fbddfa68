//! The combined `ecdsa:::bls` public key a candidate registers with.
//!
//! The on-chain form is `base64(sec1_ecdsa) ::: base64(bls_g1)` with a
//! literal `:::` separator and no whitespace.

use crate::bls::BlsPublicKey;
use crate::ecdsa::{pubkey_from_bytes, pubkey_to_bytes};
use crate::error::CryptoError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::VerifyingKey;

const SEPARATOR: &str = ":::";

/// A candidate's ECDSA identity key paired with its BLS consensus key.
#[derive(Clone, Debug)]
pub struct CombinedPubKey {
    pub ecdsa: VerifyingKey,
    pub bls: BlsPublicKey,
}

impl CombinedPubKey {
    pub fn new(ecdsa: VerifyingKey, bls: BlsPublicKey) -> Self {
        Self { ecdsa, bls }
    }

    /// Render the on-chain string form.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            BASE64.encode(pubkey_to_bytes(&self.ecdsa)),
            SEPARATOR,
            BASE64.encode(self.bls.to_bytes()),
        )
    }

    /// Parse the on-chain string form, unmarshalling both keys.
    pub fn decode(raw: &[u8]) -> Result<Self, CryptoError> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| CryptoError::BadPublicKey("combined key is not utf-8".into()))?;
        let mut parts = text.split(SEPARATOR);
        let (ecdsa_part, bls_part) = match (parts.next(), parts.next(), parts.next()) {
            (Some(e), Some(b), None) => (e, b),
            _ => {
                return Err(CryptoError::BadPublicKey(
                    "combined key must have exactly two ':::' separated parts".into(),
                ))
            }
        };

        let ecdsa_bytes = BASE64
            .decode(ecdsa_part)
            .map_err(|e| CryptoError::BadPublicKey(format!("ecdsa base64: {e}")))?;
        let ecdsa = pubkey_from_bytes(&ecdsa_bytes)?;

        let bls_bytes = BASE64
            .decode(bls_part)
            .map_err(|e| CryptoError::BadPublicKey(format!("bls base64: {e}")))?;
        let bls = BlsPublicKey::from_bytes(&bls_bytes)?;

        Ok(Self { ecdsa, bls })
    }
}
