//! The elected delegate snapshot for one epoch.

use serde::{Deserialize, Serialize};
use volta_types::params::min_required_by_delegate;
use volta_types::{Address, U256};

/// One reward recipient of a delegate, with its share in `SHARE_SCALE`
/// fixed point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributor {
    pub address: Address,
    pub shares: u64,
}

impl Distributor {
    pub fn new(address: Address, shares: u64) -> Self {
        Self { address, shares }
    }
}

/// An elected validator for one epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    pub name: Vec<u8>,
    pub address: Address,
    pub pub_key: Vec<u8>,
    pub ip_addr: Vec<u8>,
    pub port: u16,
    pub voting_power: U256,
    pub commission: u64,
    pub dist_list: Vec<Distributor>,
}

impl Delegate {
    /// Whether this delegate meets the minimum electable voting power.
    pub fn minimum_requirements(&self) -> bool {
        self.voting_power >= min_required_by_delegate()
    }
}

/// The elected delegate set, in election order (highest voting power first).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateList {
    delegates: Vec<Delegate>,
}

impl DelegateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delegates(&mut self, delegates: Vec<Delegate>) {
        self.delegates = delegates;
    }

    pub fn delegates(&self) -> &[Delegate] {
        &self.delegates
    }

    pub fn get_by_address(&self, addr: &Address) -> Option<&Delegate> {
        self.delegates.iter().find(|d| d.address == *addr)
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    /// Comma-joined member names, for logging.
    pub fn members(&self) -> String {
        self.delegates
            .iter()
            .map(|d| String::from_utf8_lossy(&d.name).into_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
