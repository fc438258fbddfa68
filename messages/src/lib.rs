//! Consensus wire messages.
//!
//! The pacemaker speaks five message kinds, encoded as one discriminant
//! byte followed by the bincode body of the variant. The discriminant *is*
//! the message type; there is no runtime type registry.

pub mod envelope;
pub mod error;

pub use envelope::TransportEnvelope;
pub use error::MessageError;

use serde::{Deserialize, Serialize};
use volta_block::QuorumCert;
use volta_types::{Address, Hash, NetAddress};

/// Maximum encoded size of a consensus message.
pub const MAX_MSG_SIZE: usize = 4 * 1024 * 1024;

/// Header present on every consensus message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusHeader {
    pub height: u64,
    pub round: u64,
    pub epoch_id: u64,
    pub sender_addr: Address,
    pub sender_index: u32,
    pub timestamp: u64,
    pub msg_type: u8,
    pub msg_subtype: u8,
}

/// A proposal for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalMsg {
    pub header: ConsensusHeader,
    pub parent_height: u64,
    pub parent_round: u64,
    /// The proposer's combined public key material.
    pub proposer_id: Vec<u8>,
    /// Block kind byte: 0 = M-block, 1 = K-block, 2 = stop-committee.
    pub proposed_block_type: u8,
    /// The encoded proposed block.
    pub proposed_block: Vec<u8>,
    /// The justify certificate (encoded), authorising the parent.
    pub justify: Vec<u8>,
    /// Carried when the round started from a timeout quorum.
    pub timeout_cert: Option<TimeoutCertMsg>,
}

/// A vote for a proposal, sent only to the round leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMsg {
    pub header: ConsensusHeader,
    pub voter_id: Vec<u8>,
    pub voter_index: u32,
    /// `Blake2b(height ∥ round ∥ block_id)` — what the share signs.
    pub signed_message_hash: Hash,
    /// The voter's BLS share over `signed_message_hash`.
    pub voter_signature: Vec<u8>,
}

/// Round-expiry notice, sent to the next leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewViewMsg {
    pub header: ConsensusHeader,
    /// The sender's highest certificate (encoded).
    pub qc_high: Vec<u8>,
    pub timeout_cert: Option<TimeoutCertMsg>,
}

/// Request for a proposal this replica could not parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProposalMsg {
    pub header: ConsensusHeader,
    pub query_height: u64,
    pub query_round: u64,
    /// Where the answer should be sent.
    pub return_addr: NetAddress,
}

/// Certificate that a round expired.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutCertMsg {
    pub timeout_height: u64,
    pub timeout_round: u64,
}

/// The consensus message sum type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsensusMessage {
    Proposal(ProposalMsg),
    Vote(VoteMsg),
    NewView(NewViewMsg),
    QueryProposal(QueryProposalMsg),
    TimeoutCert(TimeoutCertMsg),
}

const TYPE_PROPOSAL: u8 = 1;
const TYPE_VOTE: u8 = 2;
const TYPE_NEW_VIEW: u8 = 3;
const TYPE_QUERY_PROPOSAL: u8 = 4;
const TYPE_TIMEOUT_CERT: u8 = 5;

impl ConsensusMessage {
    /// The discriminant byte leading the wire form.
    pub fn msg_type(&self) -> u8 {
        match self {
            ConsensusMessage::Proposal(_) => TYPE_PROPOSAL,
            ConsensusMessage::Vote(_) => TYPE_VOTE,
            ConsensusMessage::NewView(_) => TYPE_NEW_VIEW,
            ConsensusMessage::QueryProposal(_) => TYPE_QUERY_PROPOSAL,
            ConsensusMessage::TimeoutCert(_) => TYPE_TIMEOUT_CERT,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ConsensusMessage::Proposal(_) => "Proposal",
            ConsensusMessage::Vote(_) => "VoteForProposal",
            ConsensusMessage::NewView(_) => "NewView",
            ConsensusMessage::QueryProposal(_) => "QueryProposal",
            ConsensusMessage::TimeoutCert(_) => "TimeoutCert",
        }
    }

    /// Encode as discriminant byte + bincode body.
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        let body = match self {
            ConsensusMessage::Proposal(m) => bincode::serialize(m),
            ConsensusMessage::Vote(m) => bincode::serialize(m),
            ConsensusMessage::NewView(m) => bincode::serialize(m),
            ConsensusMessage::QueryProposal(m) => bincode::serialize(m),
            ConsensusMessage::TimeoutCert(m) => bincode::serialize(m),
        }
        .map_err(|e| MessageError::Encode(e.to_string()))?;

        let mut out = Vec::with_capacity(body.len() + 1);
        out.push(self.msg_type());
        out.extend_from_slice(&body);
        if out.len() > MAX_MSG_SIZE {
            return Err(MessageError::TooLarge {
                size: out.len(),
                max: MAX_MSG_SIZE,
            });
        }
        Ok(out)
    }

    /// Decode from the wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() > MAX_MSG_SIZE {
            return Err(MessageError::TooLarge {
                size: bytes.len(),
                max: MAX_MSG_SIZE,
            });
        }
        let (&discriminant, body) = bytes
            .split_first()
            .ok_or_else(|| MessageError::Decode("empty message".into()))?;
        let decode_err = |e: bincode::Error| MessageError::Decode(e.to_string());
        match discriminant {
            TYPE_PROPOSAL => Ok(ConsensusMessage::Proposal(
                bincode::deserialize(body).map_err(decode_err)?,
            )),
            TYPE_VOTE => Ok(ConsensusMessage::Vote(
                bincode::deserialize(body).map_err(decode_err)?,
            )),
            TYPE_NEW_VIEW => Ok(ConsensusMessage::NewView(
                bincode::deserialize(body).map_err(decode_err)?,
            )),
            TYPE_QUERY_PROPOSAL => Ok(ConsensusMessage::QueryProposal(
                bincode::deserialize(body).map_err(decode_err)?,
            )),
            TYPE_TIMEOUT_CERT => Ok(ConsensusMessage::TimeoutCert(
                bincode::deserialize(body).map_err(decode_err)?,
            )),
            other => Err(MessageError::UnknownType(other)),
        }
    }

    pub fn header(&self) -> Option<&ConsensusHeader> {
        match self {
            ConsensusMessage::Proposal(m) => Some(&m.header),
            ConsensusMessage::Vote(m) => Some(&m.header),
            ConsensusMessage::NewView(m) => Some(&m.header),
            ConsensusMessage::QueryProposal(m) => Some(&m.header),
            ConsensusMessage::TimeoutCert(_) => None,
        }
    }
}

/// Decode the `justify` / `qc_high` field of a message.
pub fn decode_qc(bytes: &[u8]) -> Result<QuorumCert, MessageError> {
    QuorumCert::from_bytes(bytes).map_err(|e| MessageError::Decode(e.to_string()))
}
