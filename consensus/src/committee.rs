//! The validator committee in force for one epoch.

use volta_crypto::BlsPublicKey;
use volta_types::{Address, NetAddress};

/// One committee member.
#[derive(Clone, Debug)]
pub struct CommitteeMember {
    pub name: String,
    pub address: Address,
    /// SEC1-encoded ECDSA identity key.
    pub ecdsa_pub_key: Vec<u8>,
    pub bls_pub_key: BlsPublicKey,
    pub voting_power: u64,
    pub net_addr: NetAddress,
}

/// The ordered committee of an epoch. Member index is the voter index in
/// quorum certificates.
#[derive(Clone, Debug)]
pub struct Committee {
    pub epoch: u64,
    pub members: Vec<CommitteeMember>,
}

impl Committee {
    pub fn new(epoch: u64, members: Vec<CommitteeMember>) -> Self {
        Self { epoch, members }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// The designated proposer of a round: `members[round mod n]`.
    pub fn leader_for_round(&self, round: u64) -> Option<&CommitteeMember> {
        if self.members.is_empty() {
            return None;
        }
        let index = (round % self.members.len() as u64) as usize;
        self.members.get(index)
    }

    pub fn member(&self, index: usize) -> Option<&CommitteeMember> {
        self.members.get(index)
    }

    pub fn index_of(&self, addr: &Address) -> Option<usize> {
        self.members.iter().position(|m| m.address == *addr)
    }

    /// Whether `count` votes reach the ⅔ committee quorum.
    pub fn quorum_met(&self, count: usize) -> bool {
        !self.members.is_empty() && count * 3 >= self.members.len() * 2
    }

    /// Peers other than the member at `my_index`.
    pub fn peers_except(&self, my_index: usize) -> Vec<NetAddress> {
        self.members
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != my_index)
            .map(|(_, m)| m.net_addr)
            .collect()
    }
}
