use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TxError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("invalid signature: {0}")]
    BadSignature(String),

    #[error("intrinsic gas overflow")]
    IntrinsicGasOverflow,

    #[error("intrinsic gas ({intrinsic}) exceeds provided gas ({provided})")]
    GasTooLow { intrinsic: u64, provided: u64 },

    #[error("tx value too large")]
    ValueOverflow,

    #[error("insufficient energy")]
    InsufficientEnergy,
}
