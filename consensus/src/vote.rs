//! Vote collection and quorum certificate construction.

use crate::committee::Committee;
use crate::error::ConsensusError;
use volta_block::{BitArray, QuorumCert};
use volta_crypto::{aggregate_signatures, BlsSignature};
use volta_types::Hash;

/// One collected vote share.
#[derive(Clone, Debug)]
pub struct VoteSig {
    pub index: u32,
    pub msg_hash: Hash,
    pub signature: BlsSignature,
}

/// The round leader's vote accumulator.
#[derive(Debug, Default)]
pub struct VoteCollector {
    sigs: Vec<VoteSig>,
    bit_array: BitArray,
}

impl VoteCollector {
    pub fn new(committee_size: usize) -> Self {
        Self {
            sigs: Vec::new(),
            bit_array: BitArray::new(committee_size),
        }
    }

    /// Validate and record one vote share. A duplicate index is ignored.
    pub fn collect(
        &mut self,
        committee: &Committee,
        voter_index: u32,
        msg_hash: Hash,
        signature_bytes: &[u8],
    ) -> Result<(), ConsensusError> {
        let member = committee
            .member(voter_index as usize)
            .ok_or(ConsensusError::UnknownVoter(voter_index))?;

        let signature = BlsSignature::from_bytes(signature_bytes)
            .map_err(|e| ConsensusError::BadVoteSignature(e.to_string()))?;
        if !signature.verify(msg_hash.as_bytes(), &member.bls_pub_key) {
            return Err(ConsensusError::BadVoteSignature(format!(
                "share from voter {voter_index} does not verify"
            )));
        }

        if self.bit_array.get_index(voter_index as usize) {
            return Ok(());
        }
        self.bit_array.set_index(voter_index as usize, true);
        self.sigs.push(VoteSig {
            index: voter_index,
            msg_hash,
            signature,
        });
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.bit_array.count()
    }

    /// Whether the collected votes reach the committee quorum.
    pub fn has_quorum(&self, committee: &Committee) -> bool {
        committee.quorum_met(self.count())
    }

    /// Aggregate the collected shares into a certificate.
    pub fn build_qc(
        &self,
        height: u64,
        round: u64,
        epoch_id: u64,
    ) -> Result<QuorumCert, ConsensusError> {
        let mut ordered: Vec<&VoteSig> = self.sigs.iter().collect();
        ordered.sort_by_key(|s| s.index);

        let shares: Vec<BlsSignature> = ordered.iter().map(|s| s.signature.clone()).collect();
        let agg = aggregate_signatures(&shares)
            .map_err(|e| ConsensusError::QcAggregation(e.to_string()))?;

        Ok(QuorumCert {
            qc_height: height,
            qc_round: round,
            epoch_id,
            voter_msg_hashes: ordered.iter().map(|s| s.msg_hash).collect(),
            voter_agg_sig: agg.to_bytes().to_vec(),
            voter_bit_array_str: self.bit_array.to_json_string(),
        })
    }

    pub fn reset(&mut self, committee_size: usize) {
        self.sigs.clear();
        self.bit_array = BitArray::new(committee_size);
    }
}

/// Verify a certificate's aggregate signature against the committee.
///
/// The bit array names the signers; the i-th entry of `voter_msg_hashes`
/// belongs to the i-th set bit in ascending index order.
pub fn verify_qc(qc: &QuorumCert, committee: &Committee) -> Result<(), ConsensusError> {
    if qc.is_genesis() {
        return Ok(());
    }

    let bit_array = qc
        .voter_bit_array()
        .map_err(|e| ConsensusError::QcVerifyFailed(e.to_string()))?;
    let signers = bit_array.set_indices();

    if !committee.quorum_met(signers.len()) {
        return Err(ConsensusError::QcVerifyFailed(format!(
            "{} signers below quorum of committee size {}",
            signers.len(),
            committee.size()
        )));
    }
    if signers.len() != qc.voter_msg_hashes.len() {
        return Err(ConsensusError::QcVerifyFailed(format!(
            "{} signers but {} vote hashes",
            signers.len(),
            qc.voter_msg_hashes.len()
        )));
    }

    let agg = BlsSignature::from_bytes(&qc.voter_agg_sig)
        .map_err(|e| ConsensusError::QcVerifyFailed(e.to_string()))?;

    let mut pairs = Vec::with_capacity(signers.len());
    for (slot, index) in signers.iter().enumerate() {
        let member = committee
            .member(*index)
            .ok_or(ConsensusError::UnknownVoter(*index as u32))?;
        pairs.push((
            qc.voter_msg_hashes[slot].as_bytes().as_slice(),
            &member.bls_pub_key,
        ));
    }

    if !agg.aggregate_verify(&pairs) {
        return Err(ConsensusError::QcVerifyFailed(
            "aggregate signature does not verify".into(),
        ));
    }
    Ok(())
}
