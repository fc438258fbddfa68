//! Node-level wiring: configuration, logging and the epoch transition
//! that couples the pacemaker to the staking governance pass.

pub mod config;
pub mod epoch;
pub mod error;
pub mod logging;

pub use config::NodeConfig;
pub use epoch::{committee_from_delegates, EpochGovernor};
pub use error::NodeError;
pub use logging::init_tracing;
