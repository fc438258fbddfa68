//! Protocol constants.
//!
//! The staking constants are consensus-critical: every replica must agree on
//! them bit-exactly.

use crate::amount::{tokens, U256};
use crate::Address;

/// Gas charged per executed clause.
pub const CLAUSE_GAS: u64 = 16_000;

/// Gas charged per clause that creates a contract.
pub const CLAUSE_GAS_CONTRACT_CREATION: u64 = 48_000;

/// Base gas of any transaction.
pub const TX_GAS: u64 = 5_000;

/// Gas per zero byte of clause data.
pub const ZERO_BYTE_GAS: u64 = 4;

/// Gas per non-zero byte of clause data.
pub const NON_ZERO_BYTE_GAS: u64 = 68;

/// Minimum self-stake a registered candidate must keep forever-locked.
pub fn min_candidate_balance() -> U256 {
    tokens(100)
}

/// Minimum voting power a candidate needs to be electable as a delegate.
pub fn min_required_by_delegate() -> U256 {
    tokens(300)
}

/// Bail a jailed delegate pays (to the treasury) to exit jail.
pub fn bail_for_exit_jail() -> U256 {
    tokens(100)
}

/// Minimum interval between updates of a candidate's name / key / commission.
pub const MIN_CANDIDATE_UPDATE_INTERVAL: u64 = 7 * 24 * 3600;

/// Grace period after bucket maturation before funds are released.
pub const MATURATION_GRACE: u64 = 720;

/// Denominator of the bonus-vote accrual formula: seconds per year × 100
/// (the rate is a percentage per year).
pub const BONUS_DENOMINATOR: u64 = 365 * 24 * 3600 * 100;

/// Fixed-point scale of distribution shares and commission rates.
pub const SHARE_SCALE: u64 = 1_000_000_000;

/// Cumulative infraction points at which a delegate is jailed.
pub const JAIL_CRITERIA: u64 = 2_000;

/// Maximum entries retained in the per-epoch validator reward log.
pub const MAX_REWARD_ENTRIES: usize = 32;

/// Maximum parent-chain hops walked when checking a proposal extends the
/// locked block.
pub const SAFETY_HOP_LIMIT: usize = 10;

/// State parameter key: base gas price.
pub const KEY_BASE_GAS_PRICE: &str = "params/base-gas-price";

/// The community treasury account; bail payments land here.
pub const TREASURY: Address = Address([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x74, 0x72, 0x65, 0x61, 0x73,
]);

/// Per-epoch base reward constant recorded in the validator reward log.
pub fn initial_validator_base_reward() -> U256 {
    tokens(25)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staking_constants_are_bit_exact() {
        assert_eq!(
            min_candidate_balance(),
            U256::from_dec_str("100000000000000000000").unwrap()
        );
        assert_eq!(
            min_required_by_delegate(),
            U256::from_dec_str("300000000000000000000").unwrap()
        );
        assert_eq!(MIN_CANDIDATE_UPDATE_INTERVAL, 604_800);
        assert_eq!(BONUS_DENOMINATOR, 3_153_600_000);
        assert_eq!(SHARE_SCALE, 1_000_000_000);
        assert_eq!(MATURATION_GRACE, 720);
    }
}
