//! Staking and governance state machine.
//!
//! Stake is locked in time-weighted *buckets* that vote for *candidates*;
//! once per epoch the governing pass matures unbonding buckets, accrues
//! bonus votes, distributes validator rewards and elects the next delegate
//! set. All transitions are driven by opcode-tagged staking transactions.
//!
//! ## Module overview
//!
//! - [`body`] — the staking transaction payload and its opcodes.
//! - [`bucket`] / [`candidate`] / [`stakeholder`] — the core stake records.
//! - [`delegate`] — the elected per-epoch snapshot.
//! - [`jail`] / [`stats`] — infraction tracking and jailing.
//! - [`reward`] — the per-epoch validator reward log.
//! - [`handler`] — opcode-driven transitions over the staking state.
//! - [`governing`] — the epoch-boundary governance pass.
//! - [`epoch_reward`] — the deterministic epoch reward schedule.

pub mod body;
pub mod bucket;
pub mod candidate;
pub mod delegate;
pub mod epoch_reward;
pub mod error;
pub mod governing;
pub mod handler;
pub mod jail;
pub mod options;
pub mod reward;
pub mod stakeholder;
pub mod stats;
pub mod store;

pub use body::{Opcode, StakingBody};
pub use bucket::{Bucket, BucketList};
pub use candidate::{Candidate, CandidateList};
pub use delegate::{Delegate, DelegateList, Distributor};
pub use error::StakingError;
pub use handler::{HandlerOutcome, StakingEnv};
pub use jail::{DelegateJailed, JailList};
pub use reward::{RewardInfo, ValidatorReward, ValidatorRewardList};
pub use stakeholder::{Stakeholder, StakeholderList};
pub use stats::{DelegateStatistics, Infraction, StatisticsList};
