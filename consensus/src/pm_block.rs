//! The pacemaker's view of one proposal.
//!
//! Parents and justify certificates are logical back-links: they are
//! resolved through the height-indexed proposal map, never held as owned
//! edges, so the proposal chain has no ownership cycles.

use volta_block::{BlockType, QuorumCert};
use volta_types::Hash;

/// Execution artifacts of a validated or locally built proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutedInfo {
    pub state_root: Hash,
    pub receipts_root: Hash,
}

/// One entry of the proposal chain.
#[derive(Clone, Debug)]
pub struct PmBlock {
    pub height: u64,
    pub round: u64,
    /// Height of the parent entry in the proposal map.
    pub parent_height: u64,
    /// The certificate carried by this proposal, authorising its parent.
    pub justify: QuorumCert,
    pub block_type: BlockType,
    /// The encoded proposed block (opaque to the pacemaker).
    pub proposed_block: Vec<u8>,
    pub block_id: Hash,
    /// Present when this replica built or re-executed the block.
    pub executed: Option<ExecutedInfo>,
    /// Whether the execution engine accepted the block.
    pub success_processed: bool,
}

impl PmBlock {
    pub fn compact(&self) -> String {
        format!(
            "PmBlock({:?} height:{} round:{} id:{})",
            self.block_type, self.height, self.round, self.block_id
        )
    }
}
