//! Epoch transition: K-block commit → governing pass → next committee.

use crate::NodeError;
use volta_consensus::{Committee, CommitteeMember};
use volta_crypto::CombinedPubKey;
use volta_staking::epoch_reward::epoch_reward;
use volta_staking::{handler, Delegate, Opcode, StakingBody, StakingEnv};
use volta_state::State;
use volta_types::{Address, Bytes32, NetAddress, U256};

/// Gas granted to the governing clause; it is system-injected and pays
/// itself.
const GOVERNING_GAS: u64 = 1_000_000;

/// Derive a consensus committee from an elected delegate list.
///
/// A delegate whose key material or network address fails to parse is
/// skipped with a warning rather than aborting the epoch.
pub fn committee_from_delegates(epoch: u64, delegates: &[Delegate]) -> Committee {
    let mut members = Vec::with_capacity(delegates.len());
    for d in delegates {
        let combined = match CombinedPubKey::decode(&d.pub_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(delegate = %d.address, error = %e, "unparseable delegate key, skipped");
                continue;
            }
        };
        let ip = match std::str::from_utf8(&d.ip_addr).ok().and_then(|s| s.parse().ok()) {
            Some(ip) => ip,
            None => {
                tracing::warn!(delegate = %d.address, "unparseable delegate ip, skipped");
                continue;
            }
        };

        members.push(CommitteeMember {
            name: String::from_utf8_lossy(&d.name).into_owned(),
            address: d.address,
            ecdsa_pub_key: volta_crypto::ecdsa::pubkey_to_bytes(&combined.ecdsa),
            bls_pub_key: combined.bls,
            voting_power: whole_tokens(d.voting_power),
            net_addr: NetAddress::new(ip, d.port),
        });
    }
    Committee::new(epoch, members)
}

fn whole_tokens(value: U256) -> u64 {
    (value / U256::exp10(18)).low_u64()
}

/// Runs the governance pass over node state at each epoch boundary.
pub struct EpochGovernor<S: State> {
    state: S,
    delegate_size: u32,
}

impl<S: State> EpochGovernor<S> {
    pub fn new(state: S, delegate_size: u32) -> Self {
        Self {
            state,
            delegate_size,
        }
    }

    pub fn state(&mut self) -> &mut S {
        &mut self.state
    }

    /// Execute the governing pass for `epoch` and derive the committee of
    /// `epoch + 1` from the resulting delegate list.
    ///
    /// `validators` is the outgoing validator set to reward; `now` the
    /// committed K-block's timestamp.
    pub fn on_kblock_commit(
        &mut self,
        epoch: u32,
        now: u64,
        validators: &[Address],
    ) -> Result<Committee, NodeError> {
        let amount = epoch_reward(u64::from(epoch));
        let extra_data = bincode::serialize(validators)
            .map_err(|e| NodeError::Epoch(format!("validator set encode: {e}")))?;

        let body = StakingBody {
            opcode: Opcode::Governing,
            version: 0,
            option: self.delegate_size,
            holder_addr: Address::ZERO,
            cand_addr: Address::ZERO,
            cand_name: Vec::new(),
            cand_pub_key: Vec::new(),
            cand_ip: Vec::new(),
            cand_port: 0,
            staking_id: Bytes32::ZERO,
            amount,
            token: volta_types::Token::Base.as_byte(),
            timestamp: now,
            nonce: 0,
            extra_data,
        };

        let mut env = StakingEnv::new(&mut self.state, epoch);
        let outcome = handler::execute(&mut env, &body, GOVERNING_GAS);
        outcome
            .result
            .map_err(|e| NodeError::Epoch(format!("governing pass failed: {e}")))?;

        let delegates = volta_staking::store::get_delegate_list(&self.state);
        tracing::info!(
            epoch,
            elected = delegates.len(),
            "governing complete, deriving next committee"
        );
        Ok(committee_from_delegates(
            u64::from(epoch) + 1,
            delegates.delegates(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_crypto::{BlsKeyPair, EcdsaKeyPair};
    use volta_staking::Distributor;
    use volta_state::MemState;
    use volta_types::amount::tokens;

    fn delegate(seed: u8, power: u64) -> Delegate {
        let ec = EcdsaKeyPair::from_seed(&[seed; 32]);
        let bls = BlsKeyPair::from_ikm(&[seed; 32]);
        let combined = CombinedPubKey::new(ec.verifying_key(), bls.public().clone());
        Delegate {
            name: format!("node-{seed}").into_bytes(),
            address: ec.address(),
            pub_key: combined.encode().into_bytes(),
            ip_addr: format!("10.0.0.{seed}").into_bytes(),
            port: 8670,
            voting_power: tokens(power),
            commission: 100_000_000,
            dist_list: vec![Distributor::new(ec.address(), 1_000_000_000)],
        }
    }

    #[test]
    fn committee_derived_from_delegates() {
        let delegates = vec![delegate(1, 500), delegate(2, 400)];
        let committee = committee_from_delegates(3, &delegates);
        assert_eq!(committee.epoch, 3);
        assert_eq!(committee.size(), 2);
        assert_eq!(committee.members[0].voting_power, 500);
        assert_eq!(committee.members[0].net_addr.port, 8670);
    }

    #[test]
    fn bad_delegate_key_is_skipped() {
        let mut bad = delegate(1, 500);
        bad.pub_key = b"garbage".to_vec();
        let committee = committee_from_delegates(1, &[bad, delegate(2, 400)]);
        assert_eq!(committee.size(), 1);
    }

    #[test]
    fn bad_delegate_ip_is_skipped() {
        let mut bad = delegate(1, 500);
        bad.ip_addr = b"not-an-ip".to_vec();
        let committee = committee_from_delegates(1, &[bad]);
        assert_eq!(committee.size(), 0);
    }

    #[test]
    fn governing_with_empty_validator_set_fails() {
        let mut governor = EpochGovernor::new(MemState::new(), 3);
        assert!(governor.on_kblock_commit(1, 1_000, &[]).is_err());
    }
}
