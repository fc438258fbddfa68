//! The epoch-boundary governance pass.
//!
//! Runs exactly once per epoch when a K-block commits, in this order:
//! reward distribution, bucket maturation and bonus accrual, then the
//! election of the next delegate set.

use crate::body::StakingBody;
use crate::delegate::{Delegate, DelegateList, Distributor};
use crate::error::StakingError;
use crate::handler::{unbound_funds, StakingEnv};
use crate::reward::{RewardInfo, ValidatorReward, ValidatorRewardList};
use crate::store;
use volta_state::State;
use volta_types::params::{
    initial_validator_base_reward, BONUS_DENOMINATOR, MATURATION_GRACE, SHARE_SCALE,
};
use volta_types::{Address, U256};

/// Execute the governing pass.
///
/// `extra_data` carries the current validator set (the addresses to reward),
/// `amount` the total reward to distribute, `option` the delegate set size
/// and `timestamp` the block time driving maturation and bonus accrual.
pub fn governing(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());
    let mut stakeholder_list = store::get_stakeholder_list(env.state_ref());
    let mut delegate_list = store::get_delegate_list(env.state_ref());
    let jail_list = store::get_jail_list(env.state_ref());
    let mut reward_list = store::get_validator_reward_list(env.state_ref());

    let validators: Vec<Address> =
        bincode::deserialize(&sb.extra_data).map_err(|_| StakingError::InvalidValidatorSet)?;

    // 1. Reward the outgoing validator set before the new delegates are
    //    calculated.
    let epoch = env.epoch();
    distribute_rewards(
        env.state(),
        sb.amount,
        &validators,
        &delegate_list,
        &mut reward_list,
        epoch,
    )?;

    // 2. Mature unbonding buckets and accrue bonus votes.
    let now = sb.timestamp;
    for id in bucket_list.ids() {
        let bucket = bucket_list.get(&id).expect("id came from the list").clone();

        if bucket.unbounded {
            if now >= bucket.mature_time + MATURATION_GRACE {
                if let Some(holder) = stakeholder_list.get_mut(&bucket.owner) {
                    holder.remove_bucket(&bucket);
                    if holder.buckets.is_empty() {
                        stakeholder_list.remove(&bucket.owner);
                    }
                }

                if let Some(cand) = candidate_list.get_mut(&bucket.candidate) {
                    cand.remove_bucket(&bucket);
                    if cand.buckets.is_empty() {
                        candidate_list.remove(&bucket.candidate);
                    }
                }

                unbound_funds(env.state(), &bucket.owner, bucket.token, bucket.value);
                bucket_list.remove(&id);
            }
            // An unbonding bucket accrues nothing while it waits.
            continue;
        }

        if now >= bucket.calc_last_time {
            let elapsed = now - bucket.calc_last_time;
            let bonus = U256::from(elapsed) * U256::from(bucket.rate) * bucket.value
                / U256::from(BONUS_DENOMINATOR);
            tracing::debug!(bucket = %id, bonus = %bonus, "bonus votes accrued");

            let entry = bucket_list.get_mut(&id).expect("id came from the list");
            entry.bonus_votes = entry.bonus_votes.saturating_add(bonus.low_u64());
            entry.total_votes = entry.total_votes.saturating_add(bonus);
            entry.calc_last_time = now;

            if !bucket.candidate.is_zero() {
                if let Some(cand) = candidate_list.get_mut(&bucket.candidate) {
                    cand.total_votes = cand.total_votes.saturating_add(bonus);
                }
            }
        }
    }

    // 3. Elect the next delegate set.
    let mut delegates: Vec<Delegate> = Vec::new();
    for c in candidate_list.iter() {
        if jail_list.exist(&c.addr) {
            tracing::info!(candidate = %c.addr, "in jail, skipped from election");
            continue;
        }

        let mut delegate = Delegate {
            name: c.name.clone(),
            address: c.addr,
            pub_key: c.pub_key.clone(),
            ip_addr: c.ip_addr.clone(),
            port: c.port,
            voting_power: c.total_votes,
            commission: c.commission,
            dist_list: Vec::new(),
        };
        if !delegate.minimum_requirements() {
            tracing::info!(candidate = %c.addr, "below delegate minimum, skipped");
            continue;
        }

        for bucket_id in &c.buckets {
            let Some(b) = bucket_list.get(bucket_id) else {
                tracing::warn!(bucket = %bucket_id, "bucket lookup failed");
                continue;
            };
            let shares = (b.total_votes * U256::from(SHARE_SCALE) / c.total_votes).low_u64();
            delegate.dist_list.push(Distributor::new(b.owner, shares));
        }
        delegates.push(delegate);
    }

    delegates.sort_by(|a, b| {
        b.voting_power
            .cmp(&a.voting_power)
            .then_with(|| b.pub_key.cmp(&a.pub_key))
    });

    let delegate_size = sb.option as usize;
    if delegates.len() > delegate_size {
        delegates.truncate(delegate_size);
    }
    delegate_list.set_delegates(delegates);

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    store::set_stakeholder_list(env.state(), &stakeholder_list);
    store::set_delegate_list(env.state(), &delegate_list);
    store::set_validator_reward_list(env.state(), &reward_list);

    tracing::info!(members = %delegate_list.members(), "governing pass complete");
    Ok(())
}

/// Split `amount` evenly over the validator set and pay each validator's
/// share through its delegate's distribution list, commission first.
fn distribute_rewards(
    state: &mut dyn State,
    amount: U256,
    validators: &[Address],
    delegate_list: &DelegateList,
    reward_list: &mut ValidatorRewardList,
    epoch: u32,
) -> Result<(), StakingError> {
    if validators.is_empty() {
        return Err(StakingError::EmptyValidatorSet);
    }

    let base = amount / U256::from(validators.len() as u64);
    let mut info: Vec<RewardInfo> = Vec::new();
    let mut actual = U256::zero();

    let mut pay = |state: &mut dyn State, addr: Address, value: U256| {
        if value.is_zero() {
            return;
        }
        state.add_energy(&addr, value);
        actual += value;
        info.push(RewardInfo {
            address: addr,
            amount: value,
        });
    };

    for v in validators {
        match delegate_list.get_by_address(v) {
            Some(delegate) => {
                let commission = base * U256::from(delegate.commission) / U256::from(SHARE_SCALE);
                pay(&mut *state, delegate.address, commission);

                let remainder = base - commission;
                for dist in &delegate.dist_list {
                    let cut = remainder * U256::from(dist.shares) / U256::from(SHARE_SCALE);
                    pay(&mut *state, dist.address, cut);
                }
            }
            // A validator without a delegate row keeps its whole share.
            None => pay(&mut *state, *v, base),
        }
    }

    reward_list.append(ValidatorReward {
        epoch,
        base_reward: initial_validator_base_reward(),
        expect_distribute: amount,
        actual_distribute: actual,
        info,
    });
    Ok(())
}
