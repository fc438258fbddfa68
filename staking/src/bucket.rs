//! Stake buckets — locked stake positions with time-weighted bonus votes.

use crate::options::FOREVER_LOCK;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volta_crypto::blake2b_256_multi;
use volta_types::{Address, Bytes32, Token, U256};

/// A locked stake position.
///
/// Created by `Bound` or `Candidate`; destroyed either by a later `Unbound`
/// followed by maturation plus the grace period in the governing pass, or by
/// validator slashing. `total_votes` always equals `value` plus all bonus
/// votes accrued so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: Bytes32,
    pub owner: Address,
    /// The candidate this bucket votes for; zero when unbonded from any.
    pub candidate: Address,
    pub value: U256,
    pub token: Token,
    pub option: u32,
    /// Bonus percent per year.
    pub rate: u8,
    pub create_time: u64,
    /// Fixed once `unbounded` is set.
    pub mature_time: u64,
    /// Last time bonus votes were accrued; monotonic.
    pub calc_last_time: u64,
    pub bonus_votes: u64,
    pub total_votes: U256,
    pub unbounded: bool,
    pub nonce: u64,
}

impl Bucket {
    /// Create a fresh bucket. The id is derived from owner, nonce and
    /// creation time, so re-submitting the same bound with a new nonce
    /// yields a distinct bucket.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: Address,
        candidate: Address,
        value: U256,
        token: Token,
        option: u32,
        rate: u8,
        create_time: u64,
        nonce: u64,
    ) -> Self {
        let id = Bytes32::new(blake2b_256_multi(&[
            owner.as_bytes(),
            &nonce.to_be_bytes(),
            &create_time.to_be_bytes(),
        ]));
        Self {
            id,
            owner,
            candidate,
            value,
            token,
            option,
            rate,
            create_time,
            mature_time: 0,
            calc_last_time: create_time,
            bonus_votes: 0,
            total_votes: value,
            unbounded: false,
            nonce,
        }
    }

    pub fn is_forever_lock(&self) -> bool {
        self.option == FOREVER_LOCK
    }

    /// Switch the lock class, e.g. when a candidate's forever self-bucket is
    /// downgraded after `Uncandidate`.
    pub fn update_lock_option(&mut self, option: u32, rate: u8) {
        self.option = option;
        self.rate = rate;
    }
}

/// All buckets, keyed by id. Deterministically ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketList {
    buckets: BTreeMap<Bytes32, Bucket>,
}

impl BucketList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Bytes32) -> Option<&Bucket> {
        self.buckets.get(id)
    }

    pub fn get_mut(&mut self, id: &Bytes32) -> Option<&mut Bucket> {
        self.buckets.get_mut(id)
    }

    pub fn add(&mut self, bucket: Bucket) {
        self.buckets.insert(bucket.id, bucket);
    }

    pub fn remove(&mut self, id: &Bytes32) -> Option<Bucket> {
        self.buckets.remove(id)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    /// Ids in deterministic order; lets the governing pass mutate buckets
    /// while iterating.
    pub fn ids(&self) -> Vec<Bytes32> {
        self.buckets.keys().copied().collect()
    }
}
