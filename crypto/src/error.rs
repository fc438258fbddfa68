use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    BadPublicKey(String),

    #[error("invalid signature: {0}")]
    BadSignature(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
