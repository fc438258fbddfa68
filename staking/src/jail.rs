//! The jail — suspended delegates awaiting bail.

use crate::stats::Infraction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volta_types::{Address, U256};

/// A jailed delegate. Created when its cumulative infraction points cross
/// the jail threshold; removed when bail is paid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateJailed {
    pub addr: Address,
    pub name: Vec<u8>,
    pub pub_key: Vec<u8>,
    pub total_points: u64,
    pub infractions: Infraction,
    pub bail_amount: U256,
    pub jailed_at: u64,
}

impl DelegateJailed {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        addr: Address,
        name: Vec<u8>,
        pub_key: Vec<u8>,
        total_points: u64,
        infractions: Infraction,
        bail_amount: U256,
        jailed_at: u64,
    ) -> Self {
        Self {
            addr,
            name,
            pub_key,
            total_points,
            infractions,
            bail_amount,
            jailed_at,
        }
    }
}

/// All jailed delegates, keyed by address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JailList {
    jailed: BTreeMap<Address, DelegateJailed>,
}

impl JailList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exist(&self, addr: &Address) -> bool {
        self.jailed.contains_key(addr)
    }

    pub fn get(&self, addr: &Address) -> Option<&DelegateJailed> {
        self.jailed.get(addr)
    }

    pub fn add(&mut self, entry: DelegateJailed) {
        self.jailed.insert(entry.addr, entry);
    }

    pub fn remove(&mut self, addr: &Address) -> Option<DelegateJailed> {
        self.jailed.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.jailed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jailed.is_empty()
    }
}
