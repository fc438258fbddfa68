use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("invalid voter bit array: {0}")]
    BadBitArray(String),
}
