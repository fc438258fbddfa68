//! Per-holder aggregation of stake buckets.

use crate::bucket::Bucket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volta_types::{Address, Bytes32, U256};

/// All buckets owned by one address; `total_stake` is the sum of their
/// locked values (bonus votes do not count as stake).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub holder: Address,
    pub total_stake: U256,
    pub buckets: Vec<Bytes32>,
}

impl Stakeholder {
    pub fn new(holder: Address) -> Self {
        Self {
            holder,
            total_stake: U256::zero(),
            buckets: Vec::new(),
        }
    }

    pub fn add_bucket(&mut self, bucket: &Bucket) {
        if self.buckets.contains(&bucket.id) {
            return;
        }
        self.buckets.push(bucket.id);
        self.total_stake = self.total_stake.saturating_add(bucket.value);
    }

    pub fn remove_bucket(&mut self, bucket: &Bucket) {
        if let Some(pos) = self.buckets.iter().position(|id| *id == bucket.id) {
            self.buckets.remove(pos);
            self.total_stake = self.total_stake.saturating_sub(bucket.value);
        }
    }
}

/// All stakeholders, keyed by holder address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderList {
    holders: BTreeMap<Address, Stakeholder>,
}

impl StakeholderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, holder: &Address) -> Option<&Stakeholder> {
        self.holders.get(holder)
    }

    pub fn get_mut(&mut self, holder: &Address) -> Option<&mut Stakeholder> {
        self.holders.get_mut(holder)
    }

    pub fn add(&mut self, stakeholder: Stakeholder) {
        self.holders.insert(stakeholder.holder, stakeholder);
    }

    pub fn remove(&mut self, holder: &Address) -> Option<Stakeholder> {
        self.holders.remove(holder)
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stakeholder> {
        self.holders.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_types::amount::tokens;
    use volta_types::Token;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    fn bucket(value: u64, nonce: u64) -> Bucket {
        Bucket::new(
            addr(1),
            Address::ZERO,
            tokens(value),
            Token::Gov,
            0,
            5,
            1_000,
            nonce,
        )
    }

    #[test]
    fn total_stake_tracks_bucket_values() {
        let mut s = Stakeholder::new(addr(1));
        s.add_bucket(&bucket(100, 1));
        s.add_bucket(&bucket(20, 2));
        assert_eq!(s.total_stake, tokens(120));

        s.remove_bucket(&bucket(100, 1));
        assert_eq!(s.total_stake, tokens(20));
    }

    #[test]
    fn duplicate_add_ignored() {
        let mut s = Stakeholder::new(addr(1));
        let b = bucket(100, 1);
        s.add_bucket(&b);
        s.add_bucket(&b);
        assert_eq!(s.total_stake, tokens(100));
    }
}
