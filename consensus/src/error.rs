use thiserror::Error;

/// Pacemaker protocol errors.
///
/// Individual message errors are logged and dropped; a bad peer message
/// never aborts the round. Only locally produced encoding corruption is
/// fatal to the actor.
#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("parent at height {0} not known")]
    ParentMissing(u64),

    #[error("quorum certificate verification failed: {0}")]
    QcVerifyFailed(String),

    #[error("qc aggregation failed: {0}")]
    QcAggregation(String),

    #[error("timeout certificate mismatch")]
    TimeoutCertMismatch,

    #[error("proposal does not extend the locked block")]
    SafetyViolation,

    #[error("justify round {justify} behind qc-high round {qc_high}")]
    StaleJustify { justify: u64, qc_high: u64 },

    #[error("stop-committee block at height {0} without preceding k-block")]
    BadStopCommittee(u64),

    #[error("unknown voter index {0}")]
    UnknownVoter(u32),

    #[error("invalid vote signature: {0}")]
    BadVoteSignature(String),

    #[error("message from wrong epoch: got {got}, current {current}")]
    WrongEpoch { got: u64, current: u64 },

    #[error("not the proposer of round {0}")]
    NotProposer(u64),

    #[error("execution rejected block: {0}")]
    Execution(String),

    #[error("locally produced message corrupt: {0}")]
    Fatal(String),
}
