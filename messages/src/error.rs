use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("unknown message type byte {0}")]
    UnknownType(u8),

    #[error("message size {size} exceeds limit {max}")]
    TooLarge { size: usize, max: usize },

    #[error("invalid transport envelope: {0}")]
    BadEnvelope(String),
}
