//! Registered validator candidates.

use crate::bucket::Bucket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volta_types::{Address, Bytes32, U256};

/// A registered validator applicant.
///
/// `total_votes` is maintained as the sum of `total_votes` over the buckets
/// currently voting for this candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub addr: Address,
    pub name: Vec<u8>,
    /// Combined `ecdsa:::bls` public key string.
    pub pub_key: Vec<u8>,
    pub ip_addr: Vec<u8>,
    pub port: u16,
    /// Commission in `SHARE_SCALE` fixed point.
    pub commission: u64,
    /// Last time name / key / commission changed.
    pub timestamp: u64,
    pub buckets: Vec<Bytes32>,
    pub total_votes: U256,
}

impl Candidate {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        addr: Address,
        name: Vec<u8>,
        pub_key: Vec<u8>,
        ip_addr: Vec<u8>,
        port: u16,
        commission: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            addr,
            name,
            pub_key,
            ip_addr,
            port,
            commission,
            timestamp,
            buckets: Vec::new(),
            total_votes: U256::zero(),
        }
    }

    pub fn add_bucket(&mut self, bucket: &Bucket) {
        if self.buckets.contains(&bucket.id) {
            return;
        }
        self.buckets.push(bucket.id);
        self.total_votes = self.total_votes.saturating_add(bucket.total_votes);
    }

    pub fn remove_bucket(&mut self, bucket: &Bucket) {
        if let Some(pos) = self.buckets.iter().position(|id| *id == bucket.id) {
            self.buckets.remove(pos);
            self.total_votes = self.total_votes.saturating_sub(bucket.total_votes);
        }
    }
}

/// All candidates, keyed by address. Deterministically ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateList {
    candidates: BTreeMap<Address, Candidate>,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: &Address) -> Option<&Candidate> {
        self.candidates.get(addr)
    }

    pub fn get_mut(&mut self, addr: &Address) -> Option<&mut Candidate> {
        self.candidates.get_mut(addr)
    }

    pub fn add(&mut self, candidate: Candidate) {
        self.candidates.insert(candidate.addr, candidate);
    }

    pub fn remove(&mut self, addr: &Address) -> Option<Candidate> {
        self.candidates.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
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

    fn bucket(owner: u8, value: u64, nonce: u64) -> Bucket {
        Bucket::new(
            addr(owner),
            addr(9),
            tokens(value),
            Token::Gov,
            0,
            5,
            1_000,
            nonce,
        )
    }

    fn candidate() -> Candidate {
        Candidate::new(
            addr(9),
            b"cand".to_vec(),
            b"pubkey".to_vec(),
            b"1.2.3.4".to_vec(),
            8670,
            100_000_000,
            1_000,
        )
    }

    #[test]
    fn add_bucket_accumulates_votes() {
        let mut c = candidate();
        c.add_bucket(&bucket(1, 100, 1));
        c.add_bucket(&bucket(2, 50, 2));
        assert_eq!(c.total_votes, tokens(150));
        assert_eq!(c.buckets.len(), 2);
    }

    #[test]
    fn add_bucket_is_idempotent() {
        let mut c = candidate();
        let b = bucket(1, 100, 1);
        c.add_bucket(&b);
        c.add_bucket(&b);
        assert_eq!(c.total_votes, tokens(100));
        assert_eq!(c.buckets.len(), 1);
    }

    #[test]
    fn remove_bucket_subtracts_votes() {
        let mut c = candidate();
        let b = bucket(1, 100, 1);
        c.add_bucket(&b);
        c.remove_bucket(&b);
        assert_eq!(c.total_votes, U256::zero());
        assert!(c.buckets.is_empty());
    }

    #[test]
    fn remove_unknown_bucket_is_noop() {
        let mut c = candidate();
        c.add_bucket(&bucket(1, 100, 1));
        c.remove_bucket(&bucket(2, 50, 2));
        assert_eq!(c.total_votes, tokens(100));
    }

    #[test]
    fn list_operations() {
        let mut list = CandidateList::new();
        list.add(candidate());
        assert!(list.get(&addr(9)).is_some());
        assert!(list.get(&addr(1)).is_none());
        list.remove(&addr(9));
        assert!(list.is_empty());
    }
}
