use thiserror::Error;

/// Errors returned by the staking handlers.
///
/// A handler error means the transition was rejected and no state was
/// written; the caller gets the message text as the clause return data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("unknown staking opcode {0}")]
    UnknownOpcode(u32),

    #[error("staking body decode failed: {0}")]
    Decode(String),

    #[error("not enough base-token balance")]
    InsufficientBaseBalance,

    #[error("not enough gov-token balance")]
    InsufficientGovBalance,

    #[error("invalid token parameter")]
    InvalidToken,

    #[error("staking not found")]
    BucketNotFound,

    #[error("staking info mismatch")]
    BucketInfoMismatch,

    #[error("bucket is locked forever, can not {0}")]
    BucketForeverLocked(&'static str),

    #[error("bucket in use")]
    BucketInUse,

    #[error("bucket is not in use")]
    BucketNotInUse,

    #[error("does not meet minimal balance")]
    BelowCandidateMinimum,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid parameter: port {0} (should be in [1,65535])")]
    InvalidPort(u16),

    #[error("invalid parameter: ip {0} (should be a valid ipv4 address)")]
    InvalidIp(String),

    #[error("candidate already listed")]
    CandidateAlreadyListed,

    #[error("candidate listed with different information")]
    CandidateListedWithChanges,

    #[error("candidate is not listed")]
    CandidateNotListed,

    #[error("candidate is on jail list, exit first")]
    CandidateInJail,

    #[error("candidate is not in jail")]
    CandidateNotInJail,

    #[error("no candidate info changed")]
    CandidateUnchanged,

    #[error("update too frequently")]
    UpdateTooFrequent,

    #[error("not enough balance for bail")]
    InsufficientBail,

    #[error("invalid infraction data")]
    InvalidInfraction,

    #[error("validator set decode failed")]
    InvalidValidatorSet,

    #[error("no validators to reward")]
    EmptyValidatorSet,
}
