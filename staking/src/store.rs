//! Persistence of the staking lists in module storage.
//!
//! Each list lives under one storage key as its bincode encoding. A missing
//! slot decodes to the empty list so a fresh chain needs no initialisation.

use crate::{
    BucketList, CandidateList, DelegateList, JailList, StakeholderList, StatisticsList,
    ValidatorRewardList,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use volta_state::State;

pub const KEY_CANDIDATES: &str = "staking/candidates";
pub const KEY_BUCKETS: &str = "staking/buckets";
pub const KEY_STAKEHOLDERS: &str = "staking/stakeholders";
pub const KEY_DELEGATES: &str = "staking/delegates";
pub const KEY_JAIL: &str = "staking/jail";
pub const KEY_STATS: &str = "staking/stats";
pub const KEY_REWARDS: &str = "staking/rewards";

fn load<T: DeserializeOwned + Default>(state: &dyn State, key: &str) -> T {
    match state.storage(key) {
        Some(bytes) => bincode::deserialize(&bytes).unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "corrupt staking list, resetting");
            T::default()
        }),
        None => T::default(),
    }
}

fn save<T: Serialize>(state: &mut dyn State, key: &str, value: &T) {
    let bytes = bincode::serialize(value).expect("staking lists are always encodable");
    state.set_storage(key, bytes);
}

pub fn get_candidate_list(state: &dyn State) -> CandidateList {
    load(state, KEY_CANDIDATES)
}

pub fn set_candidate_list(state: &mut dyn State, list: &CandidateList) {
    save(state, KEY_CANDIDATES, list)
}

pub fn get_bucket_list(state: &dyn State) -> BucketList {
    load(state, KEY_BUCKETS)
}

pub fn set_bucket_list(state: &mut dyn State, list: &BucketList) {
    save(state, KEY_BUCKETS, list)
}

pub fn get_stakeholder_list(state: &dyn State) -> StakeholderList {
    load(state, KEY_STAKEHOLDERS)
}

pub fn set_stakeholder_list(state: &mut dyn State, list: &StakeholderList) {
    save(state, KEY_STAKEHOLDERS, list)
}

pub fn get_delegate_list(state: &dyn State) -> DelegateList {
    load(state, KEY_DELEGATES)
}

pub fn set_delegate_list(state: &mut dyn State, list: &DelegateList) {
    save(state, KEY_DELEGATES, list)
}

pub fn get_jail_list(state: &dyn State) -> JailList {
    load(state, KEY_JAIL)
}

pub fn set_jail_list(state: &mut dyn State, list: &JailList) {
    save(state, KEY_JAIL, list)
}

pub fn get_statistics_list(state: &dyn State) -> StatisticsList {
    load(state, KEY_STATS)
}

pub fn set_statistics_list(state: &mut dyn State, list: &StatisticsList) {
    save(state, KEY_STATS, list)
}

pub fn get_validator_reward_list(state: &dyn State) -> ValidatorRewardList {
    load(state, KEY_REWARDS)
}

pub fn set_validator_reward_list(state: &mut dyn State, list: &ValidatorRewardList) {
    save(state, KEY_REWARDS, list)
}
