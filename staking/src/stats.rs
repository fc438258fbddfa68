//! Per-delegate infraction statistics.

use crate::error::StakingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volta_types::params::JAIL_CRITERIA;
use volta_types::Address;

/// Points per missed leader slot.
pub const MISSING_LEADER_POINTS: u64 = 1_000;
/// Points per missed proposal.
pub const MISSING_PROPOSER_POINTS: u64 = 20;
/// Points per missed vote.
pub const MISSING_VOTER_POINTS: u64 = 2;
/// Points per observed double sign.
pub const DOUBLE_SIGNER_POINTS: u64 = 2_000;

/// Incremental infraction counts reported by consensus for one delegate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infraction {
    pub missing_leader: u32,
    pub missing_proposer: u32,
    pub missing_voter: u32,
    pub double_signer: u32,
}

impl Infraction {
    /// Weighted penalty points of this increment.
    pub fn points(&self) -> u64 {
        u64::from(self.missing_leader) * MISSING_LEADER_POINTS
            + u64::from(self.missing_proposer) * MISSING_PROPOSER_POINTS
            + u64::from(self.missing_voter) * MISSING_VOTER_POINTS
            + u64::from(self.double_signer) * DOUBLE_SIGNER_POINTS
    }

    pub fn accumulate(&mut self, incr: &Infraction) {
        self.missing_leader += incr.missing_leader;
        self.missing_proposer += incr.missing_proposer;
        self.missing_voter += incr.missing_voter;
        self.double_signer += incr.double_signer;
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("infraction is always encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StakingError> {
        bincode::deserialize(bytes).map_err(|e| StakingError::Decode(e.to_string()))
    }
}

/// Running infraction tally of one candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateStatistics {
    pub addr: Address,
    pub name: Vec<u8>,
    pub pub_key: Vec<u8>,
    pub total_pts: u64,
    pub infractions: Infraction,
}

impl DelegateStatistics {
    pub fn new(addr: Address, name: Vec<u8>, pub_key: Vec<u8>) -> Self {
        Self {
            addr,
            name,
            pub_key,
            total_pts: 0,
            infractions: Infraction::default(),
        }
    }

    /// Fold an increment into the tally. Returns `true` when the cumulative
    /// points cross the jail threshold.
    pub fn update(&mut self, incr: &Infraction) -> bool {
        self.infractions.accumulate(incr);
        self.total_pts = self.total_pts.saturating_add(incr.points());
        self.total_pts >= JAIL_CRITERIA
    }
}

/// All statistics rows, keyed by candidate address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsList {
    stats: BTreeMap<Address, DelegateStatistics>,
}

impl StatisticsList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: &Address) -> Option<&DelegateStatistics> {
        self.stats.get(addr)
    }

    pub fn get_mut(&mut self, addr: &Address) -> Option<&mut DelegateStatistics> {
        self.stats.get_mut(addr)
    }

    pub fn add(&mut self, stats: DelegateStatistics) {
        self.stats.insert(stats.addr, stats);
    }

    pub fn remove(&mut self, addr: &Address) -> Option<DelegateStatistics> {
        self.stats.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
