//! The staking transaction payload.
//!
//! A staking clause carries an opcode-tagged [`StakingBody`], encoded in a
//! fixed field order. Decoding is strict: unknown opcodes survive decoding
//! (the dispatcher rejects them) but trailing garbage does not.

use crate::error::StakingError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use volta_types::{Address, Bytes32, U256};

/// Operation selector of a staking transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Bound,
    Unbound,
    Candidate,
    Uncandidate,
    Delegate,
    Undelegate,
    CandidateUpdate,
    DelegateStatistics,
    DelegateExitJail,
    Governing,
}

impl Opcode {
    pub fn to_u32(self) -> u32 {
        match self {
            Opcode::Bound => 1,
            Opcode::Unbound => 2,
            Opcode::Candidate => 3,
            Opcode::Uncandidate => 4,
            Opcode::Delegate => 5,
            Opcode::Undelegate => 6,
            Opcode::CandidateUpdate => 7,
            Opcode::DelegateStatistics => 101,
            Opcode::DelegateExitJail => 102,
            Opcode::Governing => 10001,
        }
    }

    pub fn from_u32(raw: u32) -> Result<Self, StakingError> {
        match raw {
            1 => Ok(Opcode::Bound),
            2 => Ok(Opcode::Unbound),
            3 => Ok(Opcode::Candidate),
            4 => Ok(Opcode::Uncandidate),
            5 => Ok(Opcode::Delegate),
            6 => Ok(Opcode::Undelegate),
            7 => Ok(Opcode::CandidateUpdate),
            101 => Ok(Opcode::DelegateStatistics),
            102 => Ok(Opcode::DelegateExitJail),
            10001 => Ok(Opcode::Governing),
            other => Err(StakingError::UnknownOpcode(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Bound => "Bound",
            Opcode::Unbound => "Unbound",
            Opcode::Candidate => "Candidate",
            Opcode::Uncandidate => "Uncandidate",
            Opcode::Delegate => "Delegate",
            Opcode::Undelegate => "Undelegate",
            Opcode::CandidateUpdate => "CandidateUpdate",
            Opcode::DelegateStatistics => "DelegateStatistics",
            Opcode::DelegateExitJail => "DelegateExitJail",
            Opcode::Governing => "Governing",
        }
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_u32())
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Opcode::from_u32(raw).map_err(serde::de::Error::custom)
    }
}

/// Payload of a staking transaction clause, in canonical field order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingBody {
    pub opcode: Opcode,
    pub version: u32,
    pub option: u32,
    pub holder_addr: Address,
    pub cand_addr: Address,
    pub cand_name: Vec<u8>,
    pub cand_pub_key: Vec<u8>,
    pub cand_ip: Vec<u8>,
    pub cand_port: u16,
    pub staking_id: Bytes32,
    pub amount: U256,
    /// Raw token byte; validated by the handlers so an invalid byte is a
    /// handler error, not a decode error.
    pub token: u8,
    pub timestamp: u64,
    pub nonce: u64,
    pub extra_data: Vec<u8>,
}

impl StakingBody {
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("staking body is always encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakingError> {
        bincode::deserialize(bytes).map_err(|e| StakingError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> StakingBody {
        StakingBody {
            opcode: Opcode::Bound,
            version: 0,
            option: 1,
            holder_addr: Address::new([1u8; 20]),
            cand_addr: Address::ZERO,
            cand_name: b"node-1".to_vec(),
            cand_pub_key: vec![],
            cand_ip: vec![],
            cand_port: 0,
            staking_id: Bytes32::ZERO,
            amount: U256::from(1_000u64),
            token: 1,
            timestamp: 1_000,
            nonce: 7,
            extra_data: vec![],
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let body = sample_body();
        let decoded = StakingBody::from_bytes(&body.to_bytes()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn opcode_numbering() {
        assert_eq!(Opcode::Bound.to_u32(), 1);
        assert_eq!(Opcode::CandidateUpdate.to_u32(), 7);
        assert_eq!(Opcode::DelegateStatistics.to_u32(), 101);
        assert_eq!(Opcode::DelegateExitJail.to_u32(), 102);
        assert_eq!(Opcode::Governing.to_u32(), 10001);
    }

    #[test]
    fn opcode_u32_roundtrip() {
        for op in [
            Opcode::Bound,
            Opcode::Unbound,
            Opcode::Candidate,
            Opcode::Uncandidate,
            Opcode::Delegate,
            Opcode::Undelegate,
            Opcode::CandidateUpdate,
            Opcode::DelegateStatistics,
            Opcode::DelegateExitJail,
            Opcode::Governing,
        ] {
            assert_eq!(Opcode::from_u32(op.to_u32()).unwrap(), op);
        }
    }

    #[test]
    fn unknown_opcode_rejected() {
        assert!(Opcode::from_u32(9999).is_err());

        // An encoded body with an unknown opcode must fail to decode.
        let mut body = sample_body();
        body.opcode = Opcode::Governing;
        let mut bytes = body.to_bytes();
        bytes[0..4].copy_from_slice(&42u32.to_le_bytes());
        assert!(StakingBody::from_bytes(&bytes).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(StakingBody::from_bytes(&[0xFF, 0x01]).is_err());
    }
}
