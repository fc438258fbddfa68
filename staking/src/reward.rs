//! Per-epoch validator reward log.

use serde::{Deserialize, Serialize};
use volta_types::params::MAX_REWARD_ENTRIES;
use volta_types::{Address, U256};

/// One payout line of an epoch's reward distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardInfo {
    pub address: Address,
    pub amount: U256,
}

/// The reward record of one epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReward {
    pub epoch: u32,
    pub base_reward: U256,
    pub expect_distribute: U256,
    pub actual_distribute: U256,
    pub info: Vec<RewardInfo>,
}

/// Append-only reward log with ring-buffer semantics: at most
/// `MAX_REWARD_ENTRIES` epochs are retained, oldest dropped first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRewardList {
    rewards: Vec<ValidatorReward>,
}

impl ValidatorRewardList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, reward: ValidatorReward) {
        self.rewards.push(reward);
        if self.rewards.len() > MAX_REWARD_ENTRIES {
            let excess = self.rewards.len() - MAX_REWARD_ENTRIES;
            self.rewards.drain(..excess);
        }
    }

    pub fn rewards(&self) -> &[ValidatorReward] {
        &self.rewards
    }

    pub fn get_by_epoch(&self, epoch: u32) -> Option<&ValidatorReward> {
        self.rewards.iter().find(|r| r.epoch == epoch)
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}
