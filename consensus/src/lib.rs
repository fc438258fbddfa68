//! HotStuff-style pacemaker for the Volta chain.
//!
//! The pacemaker drives block proposals and quorum certificate formation
//! across a rotating committee:
//!
//! - [`committee`] — the per-epoch validator set and leader schedule.
//! - [`pm_block`] — the height-indexed proposal chain entries.
//! - [`vote`] — BLS vote collection and QC construction/verification.
//! - [`pending`] — parking lot for proposals with unknown parents.
//! - [`timeout`] — round timers and timeout certificates.
//! - [`pacemaker`] — the state machine itself.
//! - [`actor`] — the tokio event loop wrapping the state machine.

pub mod actor;
pub mod committee;
pub mod error;
pub mod pacemaker;
pub mod pending;
pub mod pm_block;
pub mod timeout;
pub mod vote;

pub use actor::Inbound;
pub use committee::{Committee, CommitteeMember};
pub use error::ConsensusError;
pub use pacemaker::{ChainDriver, MsgOutbound, Pacemaker};
pub use pending::PendingList;
pub use pm_block::{ExecutedInfo, PmBlock};
pub use timeout::{verify_timeout_cert, RoundTimer};
pub use vote::{verify_qc, VoteCollector};
