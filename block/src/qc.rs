//! Quorum certificates.
//!
//! A QC proves that at least ⅔ of the epoch's committee signed the same
//! block. The bit array names the signers, `voter_msg_hashes` holds each
//! signer's vote hash at the matching index, and `voter_agg_sig` is the BLS
//! aggregate over exactly those shares.

use crate::bitarray::BitArray;
use crate::error::BlockError;
use serde::{Deserialize, Serialize};
use volta_types::Hash;

/// Canonical quorum certificate, encoded in the field order below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumCert {
    pub qc_height: u64,
    pub qc_round: u64,
    pub epoch_id: u64,
    /// Per-voter vote hashes, ordered by ascending committee index.
    pub voter_msg_hashes: Vec<Hash>,
    /// BLS aggregate signature over the shares named by the bit array.
    pub voter_agg_sig: Vec<u8>,
    /// Compact JSON-string form of the voter bit array.
    pub voter_bit_array_str: String,
}

impl QuorumCert {
    /// The genesis certificate: height, round and epoch all zero.
    pub fn genesis() -> Self {
        Self {
            qc_height: 0,
            qc_round: 0,
            epoch_id: 0,
            voter_msg_hashes: Vec::new(),
            voter_agg_sig: Vec::new(),
            voter_bit_array_str: BitArray::new(0).to_json_string(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.qc_height == 0 && self.qc_round == 0 && self.epoch_id == 0
    }

    /// Decode the voter bit array from its wire form.
    pub fn voter_bit_array(&self) -> Result<BitArray, BlockError> {
        BitArray::from_json_string(&self.voter_bit_array_str)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("qc is always encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        bincode::deserialize(bytes).map_err(|e| BlockError::Decode(e.to_string()))
    }

    /// Short display form for logs.
    pub fn compact(&self) -> String {
        format!(
            "QC(height:{}, round:{}, epoch:{})",
            self.qc_height, self.qc_round, self.epoch_id
        )
    }
}
