use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    BadAddress(String),

    #[error("invalid 32-byte id: {0}")]
    BadBytes32(String),

    #[error("invalid token byte: {0}")]
    BadToken(u8),
}
