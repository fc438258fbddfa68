//! In-memory state implementation.

use crate::State;
use std::collections::BTreeMap;
use volta_types::{Address, U256};

#[derive(Clone, Debug, Default)]
struct Account {
    balance: U256,
    energy: U256,
    bounded_balance: U256,
    bounded_energy: U256,
}

/// State held entirely in memory.
///
/// Deterministically ordered maps so serialized snapshots are stable.
#[derive(Clone, Debug, Default)]
pub struct MemState {
    accounts: BTreeMap<Address, Account>,
    storage: BTreeMap<String, Vec<u8>>,
    params: BTreeMap<String, U256>,
    sponsors: BTreeMap<Address, Address>,
    credits: BTreeMap<(Address, Address), U256>,
}

impl MemState {
    pub fn new() -> Self {
        Self::default()
    }

    fn account_mut(&mut self, addr: &Address) -> &mut Account {
        self.accounts.entry(*addr).or_default()
    }
}

impl State for MemState {
    fn balance(&self, addr: &Address) -> U256 {
        self.accounts.get(addr).map(|a| a.balance).unwrap_or_default()
    }

    fn energy(&self, addr: &Address) -> U256 {
        self.accounts.get(addr).map(|a| a.energy).unwrap_or_default()
    }

    fn bounded_balance(&self, addr: &Address) -> U256 {
        self.accounts
            .get(addr)
            .map(|a| a.bounded_balance)
            .unwrap_or_default()
    }

    fn bounded_energy(&self, addr: &Address) -> U256 {
        self.accounts
            .get(addr)
            .map(|a| a.bounded_energy)
            .unwrap_or_default()
    }

    fn add_balance(&mut self, addr: &Address, amount: U256) {
        let acct = self.account_mut(addr);
        acct.balance = acct.balance.saturating_add(amount);
    }

    fn sub_balance(&mut self, addr: &Address, amount: U256) -> bool {
        let acct = self.account_mut(addr);
        if acct.balance < amount {
            return false;
        }
        acct.balance -= amount;
        true
    }

    fn add_energy(&mut self, addr: &Address, amount: U256) {
        let acct = self.account_mut(addr);
        acct.energy = acct.energy.saturating_add(amount);
    }

    fn sub_energy(&mut self, addr: &Address, amount: U256) -> bool {
        let acct = self.account_mut(addr);
        if acct.energy < amount {
            return false;
        }
        acct.energy -= amount;
        true
    }

    fn add_bounded_balance(&mut self, addr: &Address, amount: U256) {
        let acct = self.account_mut(addr);
        acct.bounded_balance = acct.bounded_balance.saturating_add(amount);
    }

    fn sub_bounded_balance(&mut self, addr: &Address, amount: U256) -> bool {
        let acct = self.account_mut(addr);
        if acct.bounded_balance < amount {
            return false;
        }
        acct.bounded_balance -= amount;
        true
    }

    fn add_bounded_energy(&mut self, addr: &Address, amount: U256) {
        let acct = self.account_mut(addr);
        acct.bounded_energy = acct.bounded_energy.saturating_add(amount);
    }

    fn sub_bounded_energy(&mut self, addr: &Address, amount: U256) -> bool {
        let acct = self.account_mut(addr);
        if acct.bounded_energy < amount {
            return false;
        }
        acct.bounded_energy -= amount;
        true
    }

    fn storage(&self, key: &str) -> Option<Vec<u8>> {
        self.storage.get(key).cloned()
    }

    fn set_storage(&mut self, key: &str, value: Vec<u8>) {
        self.storage.insert(key.to_string(), value);
    }

    fn param(&self, key: &str) -> U256 {
        self.params.get(key).copied().unwrap_or_default()
    }

    fn set_param(&mut self, key: &str, value: U256) {
        self.params.insert(key.to_string(), value);
    }

    fn current_sponsor(&self, target: &Address) -> Option<Address> {
        self.sponsors.get(target).copied()
    }

    fn set_sponsor(&mut self, target: &Address, sponsor: Option<Address>) {
        match sponsor {
            Some(s) => {
                self.sponsors.insert(*target, s);
            }
            None => {
                self.sponsors.remove(target);
            }
        }
    }

    fn user_credit(&self, target: &Address, user: &Address, _block_time: u64) -> U256 {
        self.credits
            .get(&(*target, *user))
            .copied()
            .unwrap_or_default()
    }

    fn set_user_credit(&mut self, target: &Address, user: &Address, credit: U256, _block_time: u64) {
        self.credits.insert((*target, *user), credit);
    }
}
