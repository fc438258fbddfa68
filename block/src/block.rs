//! The chain block carried inside pacemaker proposals.
//!
//! The pacemaker treats the block body as opaque execution input; only the
//! header linkage and the block type matter to consensus.

use crate::error::BlockError;
use crate::qc::QuorumCert;
use serde::{Deserialize, Serialize};
use volta_crypto::hash_block;
use volta_types::{Address, Hash};

/// What kind of block a proposal carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    /// Mid-epoch block.
    MBlock,
    /// Epoch-boundary block; committing it triggers the governing pass.
    KBlock,
    /// Sealing block proposed after a K-block to retire the committee.
    StopCommittee,
}

/// A proposed chain block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub parent_id: Hash,
    pub timestamp: u64,
    pub proposer: Address,
    pub block_type: BlockType,
    /// Opaque transaction payload handed to the execution engine.
    pub txs: Vec<u8>,
    /// The certificate that justified this block's parent, once known.
    pub qc: Option<QuorumCert>,
}

impl Block {
    /// The block id: the Blake2b digest of the header fields (the QC is
    /// excluded so the id is stable before and after certification).
    pub fn id(&self) -> Hash {
        let header = (
            self.height,
            self.parent_id,
            self.timestamp,
            self.proposer,
            self.block_type,
            &self.txs,
        );
        let bytes = bincode::serialize(&header).expect("header is always encodable");
        hash_block(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("block is always encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        bincode::deserialize(bytes).map_err(|e| BlockError::Decode(e.to_string()))
    }

    /// One-line display form for logs.
    pub fn oneliner(&self) -> String {
        format!(
            "Block({:?} height:{} id:{} parent:{})",
            self.block_type,
            self.height,
            self.id(),
            self.parent_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block(height: u64) -> Block {
        Block {
            height,
            parent_id: Hash::new([3u8; 32]),
            timestamp: 1_700_000_000,
            proposer: Address::new([9u8; 20]),
            block_type: BlockType::MBlock,
            txs: vec![1, 2, 3],
            qc: None,
        }
    }

    #[test]
    fn id_is_deterministic() {
        assert_eq!(sample_block(5).id(), sample_block(5).id());
        assert_ne!(sample_block(5).id(), sample_block(6).id());
    }

    #[test]
    fn id_ignores_qc() {
        let mut with_qc = sample_block(5);
        with_qc.qc = Some(QuorumCert::genesis());
        assert_eq!(with_qc.id(), sample_block(5).id());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let block = sample_block(7);
        assert_eq!(Block::from_bytes(&block.to_bytes()).unwrap(), block);
    }

    #[test]
    fn corrupt_bytes_rejected() {
        assert!(Block::from_bytes(&[0xDE, 0xAD]).is_err());
    }
}
