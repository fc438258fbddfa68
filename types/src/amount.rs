//! 256-bit amount helpers.
//!
//! Stake values, vote totals and account balances are 256-bit unsigned
//! integers in native units (10^18 per whole token).

pub use primitive_types::U256;

/// Number of native units per whole token.
pub fn unit() -> U256 {
    U256::exp10(18)
}

/// `n` whole tokens in native units.
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_scale() {
        assert_eq!(tokens(1), U256::exp10(18));
        assert_eq!(tokens(100), U256::from(100u64) * U256::exp10(18));
    }

    #[test]
    fn zero_tokens() {
        assert_eq!(tokens(0), U256::zero());
    }
}
