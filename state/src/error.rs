use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("insufficient balance for {0}")]
    InsufficientBalance(String),

    #[error("corrupt storage entry under {key}: {reason}")]
    CorruptStorage { key: String, reason: String },
}
