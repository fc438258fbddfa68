//! Opcode-driven transitions over the staking state.
//!
//! Every handler is all-or-nothing: lists are loaded from storage, mutated
//! in memory and written back only when every check passed. Gas for the
//! clause is charged regardless of the outcome, clamped at zero.

use crate::body::{Opcode, StakingBody};
use crate::bucket::Bucket;
use crate::candidate::Candidate;
use crate::error::StakingError;
use crate::governing;
use crate::jail::DelegateJailed;
use crate::options::{bound_lock_option, bound_locktime, commission_rate, FOREVER_LOCK, FOUR_WEEK_LOCK};
use crate::stakeholder::Stakeholder;
use crate::stats::{DelegateStatistics, Infraction};
use crate::store;
use volta_crypto::CombinedPubKey;
use volta_state::State;
use volta_types::params::{
    bail_for_exit_jail, min_required_by_delegate, CLAUSE_GAS, MIN_CANDIDATE_UPDATE_INTERVAL,
    TREASURY,
};
use volta_types::{Address, Token, U256};

/// Execution context of a staking clause.
///
/// The epoch is supplied by the block processor (it is known at K-block
/// commit time), never read out of the transaction payload.
pub struct StakingEnv<'a> {
    state: &'a mut dyn State,
    epoch: u32,
}

impl<'a> StakingEnv<'a> {
    pub fn new(state: &'a mut dyn State, epoch: u32) -> Self {
        Self { state, epoch }
    }

    pub fn state(&mut self) -> &mut dyn State {
        self.state
    }

    pub fn state_ref(&self) -> &dyn State {
        self.state
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

/// Result of one staking clause.
#[derive(Debug)]
pub struct HandlerOutcome {
    pub leftover_gas: u64,
    pub result: Result<(), StakingError>,
}

impl HandlerOutcome {
    /// The clause return data: empty on success, the error text otherwise.
    pub fn return_data(&self) -> Vec<u8> {
        match &self.result {
            Ok(()) => Vec::new(),
            Err(e) => e.to_string().into_bytes(),
        }
    }
}

/// Dispatch a staking body to its opcode handler.
pub fn execute(env: &mut StakingEnv<'_>, sb: &StakingBody, gas: u64) -> HandlerOutcome {
    let leftover_gas = gas.saturating_sub(CLAUSE_GAS);

    let result = match sb.opcode {
        Opcode::Bound => bound(env, sb),
        Opcode::Unbound => unbound(env, sb),
        Opcode::Candidate => candidate(env, sb),
        Opcode::Uncandidate => uncandidate(env, sb),
        Opcode::Delegate => delegate(env, sb),
        Opcode::Undelegate => undelegate(env, sb),
        Opcode::CandidateUpdate => candidate_update(env, sb),
        Opcode::DelegateStatistics => delegate_statistics(env, sb),
        Opcode::DelegateExitJail => delegate_exit_jail(env, sb),
        Opcode::Governing => governing::governing(env, sb),
    };

    if let Err(ref e) = result {
        tracing::warn!(opcode = sb.opcode.name(), error = %e, "staking clause rejected");
    }

    HandlerOutcome {
        leftover_gas,
        result,
    }
}

fn token_of(sb: &StakingBody) -> Result<Token, StakingError> {
    Token::try_from(sb.token).map_err(|_| StakingError::InvalidToken)
}

fn check_funds(
    state: &dyn State,
    addr: &Address,
    token: Token,
    amount: U256,
) -> Result<(), StakingError> {
    match token {
        Token::Base => {
            if state.energy(addr) < amount {
                return Err(StakingError::InsufficientBaseBalance);
            }
        }
        Token::Gov => {
            if state.balance(addr) < amount {
                return Err(StakingError::InsufficientGovBalance);
            }
        }
    }
    Ok(())
}

/// Move `amount` from the liquid to the bound side of an account.
pub(crate) fn bound_funds(
    state: &mut dyn State,
    addr: &Address,
    token: Token,
    amount: U256,
) -> Result<(), StakingError> {
    let ok = match token {
        Token::Base => state.sub_energy(addr, amount),
        Token::Gov => state.sub_balance(addr, amount),
    };
    if !ok {
        return Err(match token {
            Token::Base => StakingError::InsufficientBaseBalance,
            Token::Gov => StakingError::InsufficientGovBalance,
        });
    }
    match token {
        Token::Base => state.add_bounded_energy(addr, amount),
        Token::Gov => state.add_bounded_balance(addr, amount),
    }
    Ok(())
}

/// Release `amount` from the bound side back to the liquid side.
pub(crate) fn unbound_funds(state: &mut dyn State, addr: &Address, token: Token, amount: U256) {
    match token {
        Token::Base => {
            state.sub_bounded_energy(addr, amount);
            state.add_energy(addr, amount);
        }
        Token::Gov => {
            state.sub_bounded_balance(addr, amount);
            state.add_balance(addr, amount);
        }
    }
}

fn is_ipv4(raw: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(raw) else {
        return false;
    };
    let parts: Vec<&str> = text.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

fn validate_net_params(sb: &StakingBody) -> Result<(), StakingError> {
    CombinedPubKey::decode(&sb.cand_pub_key).map_err(|_| StakingError::InvalidPublicKey)?;
    if sb.cand_port < 1 {
        return Err(StakingError::InvalidPort(sb.cand_port));
    }
    if !is_ipv4(&sb.cand_ip) {
        return Err(StakingError::InvalidIp(
            String::from_utf8_lossy(&sb.cand_ip).into_owned(),
        ));
    }
    Ok(())
}

// ── Bound / Unbound ─────────────────────────────────────────────────────

fn bound(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let token = token_of(sb)?;
    check_funds(env.state_ref(), &sb.holder_addr, token, sb.amount)?;

    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());
    let mut stakeholder_list = store::get_stakeholder_list(env.state_ref());

    // An unknown candidate target downgrades the bound to an unbonded bucket.
    let cand_addr = if !sb.cand_addr.is_zero() && candidate_list.get(&sb.cand_addr).is_some() {
        sb.cand_addr
    } else {
        if !sb.cand_addr.is_zero() {
            tracing::warn!(candidate = %sb.cand_addr, "candidate is not listed");
        }
        Address::ZERO
    };

    let (opt, rate, locktime) = bound_lock_option(sb.option);
    tracing::info!(option = opt, rate, locktime, "bound lock option");

    let bucket = Bucket::new(
        sb.holder_addr,
        cand_addr,
        sb.amount,
        token,
        opt,
        rate,
        sb.timestamp,
        sb.nonce,
    );

    match stakeholder_list.get_mut(&sb.holder_addr) {
        Some(holder) => holder.add_bucket(&bucket),
        None => {
            let mut holder = Stakeholder::new(sb.holder_addr);
            holder.add_bucket(&bucket);
            stakeholder_list.add(holder);
        }
    }

    if !cand_addr.is_zero() {
        let cand = candidate_list
            .get_mut(&cand_addr)
            .ok_or(StakingError::CandidateNotListed)?;
        cand.add_bucket(&bucket);
    }

    bucket_list.add(bucket);
    bound_funds(env.state(), &sb.holder_addr, token, sb.amount)?;

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    store::set_stakeholder_list(env.state(), &stakeholder_list);
    Ok(())
}

fn unbound(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut bucket_list = store::get_bucket_list(env.state_ref());

    let bucket = bucket_list
        .get_mut(&sb.staking_id)
        .ok_or(StakingError::BucketNotFound)?;
    if bucket.owner != sb.holder_addr
        || bucket.value != sb.amount
        || bucket.token.as_byte() != sb.token
    {
        return Err(StakingError::BucketInfoMismatch);
    }
    if bucket.is_forever_lock() {
        return Err(StakingError::BucketForeverLocked("unbond"));
    }

    bucket.unbounded = true;
    bucket.mature_time = sb.timestamp + bound_locktime(bucket.option);

    store::set_bucket_list(env.state(), &bucket_list);
    Ok(())
}

// ── Candidate lifecycle ─────────────────────────────────────────────────

fn candidate(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    if sb.amount < min_required_by_delegate() {
        return Err(StakingError::BelowCandidateMinimum);
    }
    let token = token_of(sb)?;
    check_funds(env.state_ref(), &sb.cand_addr, token, sb.amount)?;
    validate_net_params(sb)?;

    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());
    let mut stakeholder_list = store::get_stakeholder_list(env.state_ref());

    if let Some(record) = candidate_list.get(&sb.cand_addr) {
        if record.pub_key == sb.cand_pub_key
            && record.ip_addr == sb.cand_ip
            && record.port == sb.cand_port
        {
            return Err(StakingError::CandidateAlreadyListed);
        }
        return Err(StakingError::CandidateListedWithChanges);
    }

    // Self-stake is forced into the forever lock; the option field carries
    // the chosen commission instead.
    let (opt, rate, locktime) = bound_lock_option(FOREVER_LOCK);
    let commission = commission_rate(sb.option);
    tracing::info!(option = opt, rate, locktime, commission, "register candidate");

    let bucket = Bucket::new(
        sb.cand_addr,
        sb.cand_addr,
        sb.amount,
        token,
        opt,
        rate,
        sb.timestamp,
        sb.nonce,
    );

    let mut cand = Candidate::new(
        sb.cand_addr,
        sb.cand_name.clone(),
        sb.cand_pub_key.clone(),
        sb.cand_ip.clone(),
        sb.cand_port,
        commission,
        sb.timestamp,
    );
    cand.add_bucket(&bucket);
    candidate_list.add(cand);

    match stakeholder_list.get_mut(&sb.cand_addr) {
        Some(holder) => holder.add_bucket(&bucket),
        None => {
            let mut holder = Stakeholder::new(sb.cand_addr);
            holder.add_bucket(&bucket);
            stakeholder_list.add(holder);
        }
    }

    bucket_list.add(bucket);
    bound_funds(env.state(), &sb.cand_addr, token, sb.amount)?;

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    store::set_stakeholder_list(env.state(), &stakeholder_list);
    Ok(())
}

fn uncandidate(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());
    let jail_list = store::get_jail_list(env.state_ref());

    let record = candidate_list
        .get(&sb.cand_addr)
        .ok_or(StakingError::CandidateNotListed)?
        .clone();
    if jail_list.exist(&sb.cand_addr) {
        return Err(StakingError::CandidateInJail);
    }

    for id in &record.buckets {
        let Some(bucket) = bucket_list.get_mut(id) else {
            tracing::error!(bucket = %id, "bucket not found");
            continue;
        };
        if bucket.candidate != record.addr {
            tracing::error!(candidate = %record.addr, "bucket info mismatch");
            continue;
        }
        bucket.candidate = Address::ZERO;
        // The forever self-bucket falls back to the longest regular lock.
        if bucket.is_forever_lock() {
            let (opt, rate, _) = bound_lock_option(FOUR_WEEK_LOCK);
            bucket.update_lock_option(opt, rate);
        }
    }
    candidate_list.remove(&record.addr);

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    Ok(())
}

// ── Delegate / Undelegate ───────────────────────────────────────────────

fn delegate(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());

    let bucket = bucket_list
        .get_mut(&sb.staking_id)
        .ok_or(StakingError::BucketNotFound)?;
    if bucket.owner != sb.holder_addr
        || bucket.value != sb.amount
        || bucket.token.as_byte() != sb.token
    {
        return Err(StakingError::BucketInfoMismatch);
    }
    if bucket.is_forever_lock() {
        return Err(StakingError::BucketForeverLocked("delegate"));
    }
    if !bucket.candidate.is_zero() {
        return Err(StakingError::BucketInUse);
    }

    let cand = candidate_list
        .get_mut(&sb.cand_addr)
        .ok_or(StakingError::CandidateNotListed)?;

    bucket.candidate = sb.cand_addr;
    cand.add_bucket(bucket);

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    Ok(())
}

fn undelegate(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let mut bucket_list = store::get_bucket_list(env.state_ref());

    let bucket = bucket_list
        .get_mut(&sb.staking_id)
        .ok_or(StakingError::BucketNotFound)?;
    if bucket.owner != sb.holder_addr
        || bucket.value != sb.amount
        || bucket.token.as_byte() != sb.token
    {
        return Err(StakingError::BucketInfoMismatch);
    }
    if bucket.is_forever_lock() {
        return Err(StakingError::BucketForeverLocked("undelegate"));
    }
    if bucket.candidate.is_zero() {
        return Err(StakingError::BucketNotInUse);
    }

    let cand = candidate_list
        .get_mut(&bucket.candidate)
        .ok_or(StakingError::CandidateNotListed)?;

    cand.remove_bucket(bucket);
    bucket.candidate = Address::ZERO;

    store::set_candidate_list(env.state(), &candidate_list);
    store::set_bucket_list(env.state(), &bucket_list);
    Ok(())
}

// ── Candidate update ────────────────────────────────────────────────────

fn candidate_update(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    validate_net_params(sb)?;

    let mut candidate_list = store::get_candidate_list(env.state_ref());
    let jail_list = store::get_jail_list(env.state_ref());

    if jail_list.exist(&sb.cand_addr) {
        return Err(StakingError::CandidateInJail);
    }
    let record = candidate_list
        .get_mut(&sb.cand_addr)
        .ok_or(StakingError::CandidateNotListed)?;

    let pub_updated = record.pub_key != sb.cand_pub_key;
    let name_updated = record.name != sb.cand_name;
    let commission = commission_rate(sb.option);
    let commission_updated = record.commission != commission;

    // Name, key and commission changes are rate limited; ip/port are not.
    if (pub_updated || name_updated || commission_updated)
        && sb.timestamp.saturating_sub(record.timestamp) < MIN_CANDIDATE_UPDATE_INTERVAL
    {
        return Err(StakingError::UpdateTooFrequent);
    }

    let mut changed = false;
    if pub_updated {
        record.pub_key = sb.cand_pub_key.clone();
        changed = true;
    }
    if name_updated {
        record.name = sb.cand_name.clone();
        changed = true;
    }
    if commission_updated {
        record.commission = commission;
        changed = true;
    }
    if pub_updated || name_updated || commission_updated {
        record.timestamp = sb.timestamp;
    }

    if record.ip_addr != sb.cand_ip {
        record.ip_addr = sb.cand_ip.clone();
        changed = true;
    }
    if record.port != sb.cand_port {
        record.port = sb.cand_port;
        changed = true;
    }

    if !changed {
        return Err(StakingError::CandidateUnchanged);
    }

    store::set_candidate_list(env.state(), &candidate_list);
    Ok(())
}

// ── Statistics and jail ─────────────────────────────────────────────────

fn delegate_statistics(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut statistics_list = store::get_statistics_list(env.state_ref());
    let mut jail_list = store::get_jail_list(env.state_ref());

    // A jailed delegate keeps receiving reports; it already paid for them.
    if jail_list.exist(&sb.cand_addr) {
        tracing::info!(candidate = %sb.cand_addr, "already jailed, statistics ignored");
        return Ok(());
    }

    let incr =
        Infraction::from_bytes(&sb.extra_data).map_err(|_| StakingError::InvalidInfraction)?;
    tracing::info!(candidate = %sb.cand_addr, ?incr, "received statistics");

    let jail = match statistics_list.get_mut(&sb.cand_addr) {
        Some(stats) => stats.update(&incr),
        None => {
            let mut stats = DelegateStatistics::new(
                sb.cand_addr,
                sb.cand_name.clone(),
                sb.cand_pub_key.clone(),
            );
            let jail = stats.update(&incr);
            statistics_list.add(stats);
            jail
        }
    };

    if jail {
        let stats = statistics_list
            .remove(&sb.cand_addr)
            .expect("stats row was just updated");
        tracing::warn!(
            candidate = %stats.addr,
            total_pts = stats.total_pts,
            "delegate jailed"
        );
        jail_list.add(DelegateJailed::new(
            stats.addr,
            stats.name,
            stats.pub_key,
            stats.total_pts,
            stats.infractions,
            bail_for_exit_jail(),
            sb.timestamp,
        ));
    }

    store::set_statistics_list(env.state(), &statistics_list);
    store::set_jail_list(env.state(), &jail_list);
    Ok(())
}

fn delegate_exit_jail(env: &mut StakingEnv<'_>, sb: &StakingBody) -> Result<(), StakingError> {
    let mut jail_list = store::get_jail_list(env.state_ref());

    let jailed = jail_list
        .get(&sb.cand_addr)
        .ok_or(StakingError::CandidateNotInJail)?
        .clone();

    if env.state_ref().balance(&jailed.addr) < jailed.bail_amount {
        return Err(StakingError::InsufficientBail);
    }

    let state = env.state();
    if !state.sub_balance(&jailed.addr, jailed.bail_amount) {
        return Err(StakingError::InsufficientBail);
    }
    state.add_balance(&TREASURY, jailed.bail_amount);
    jail_list.remove(&jailed.addr);

    tracing::info!(candidate = %jailed.addr, "released from jail");
    store::set_jail_list(env.state(), &jail_list);
    Ok(())
}
