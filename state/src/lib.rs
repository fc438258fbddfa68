//! Account and module state view.
//!
//! The rest of the workspace reads and writes chain state only through the
//! [`State`] trait: per-account balances of the two native tokens (liquid and
//! bound), module storage slots, protocol parameters, and the sponsorship
//! bindings the gas-prepay path consults. Storage backends implement the
//! trait; [`MemState`] is the in-memory implementation used by the block
//! processor's working state and by every test.

pub mod error;
pub mod memory;

pub use error::StateError;
pub use memory::MemState;

use volta_types::{Address, U256};

/// Read/write view over chain state.
///
/// All mutation methods are infallible bookkeeping except the `sub_*`
/// family, which returns `false` (and leaves state untouched) when the
/// balance is insufficient.
pub trait State {
    /// Liquid governance-token balance.
    fn balance(&self, addr: &Address) -> U256;

    /// Liquid base-token (energy) balance.
    fn energy(&self, addr: &Address) -> U256;

    /// Governance tokens locked in stake buckets.
    fn bounded_balance(&self, addr: &Address) -> U256;

    /// Base tokens locked in stake buckets.
    fn bounded_energy(&self, addr: &Address) -> U256;

    fn add_balance(&mut self, addr: &Address, amount: U256);
    fn sub_balance(&mut self, addr: &Address, amount: U256) -> bool;
    fn add_energy(&mut self, addr: &Address, amount: U256);
    fn sub_energy(&mut self, addr: &Address, amount: U256) -> bool;

    fn add_bounded_balance(&mut self, addr: &Address, amount: U256);
    fn sub_bounded_balance(&mut self, addr: &Address, amount: U256) -> bool;
    fn add_bounded_energy(&mut self, addr: &Address, amount: U256);
    fn sub_bounded_energy(&mut self, addr: &Address, amount: U256) -> bool;

    /// Raw module storage slot (staking lists, auction state, ...).
    fn storage(&self, key: &str) -> Option<Vec<u8>>;
    fn set_storage(&mut self, key: &str, value: Vec<u8>);

    /// Numeric protocol parameter slot.
    fn param(&self, key: &str) -> U256;
    fn set_param(&mut self, key: &str, value: U256);

    /// The current gas sponsor of a contract, if one is active.
    fn current_sponsor(&self, target: &Address) -> Option<Address>;
    fn set_sponsor(&mut self, target: &Address, sponsor: Option<Address>);

    /// Remaining gas credit `user` has with contract `target` at
    /// `block_time` (backends may decay credit over time).
    fn user_credit(&self, target: &Address, user: &Address, block_time: u64) -> U256;
    fn set_user_credit(&mut self, target: &Address, user: &Address, credit: U256, block_time: u64);
}
