//! Stake lock classes and commission rates.

use volta_types::params::SHARE_SCALE;

/// One-week lock class.
pub const ONE_WEEK_LOCK: u32 = 0;
/// Two-week lock class.
pub const TWO_WEEK_LOCK: u32 = 1;
/// Three-week lock class.
pub const THREE_WEEK_LOCK: u32 = 2;
/// Four-week lock class.
pub const FOUR_WEEK_LOCK: u32 = 3;
/// Forever lock class, required for a candidate's self-stake.
pub const FOREVER_LOCK: u32 = 1000;

const WEEK: u64 = 7 * 24 * 3600;

/// Resolve a lock option to `(option, bonus rate %/year, lock duration)`.
///
/// Unknown options fall back to the one-week class.
pub fn bound_lock_option(option: u32) -> (u32, u8, u64) {
    match option {
        ONE_WEEK_LOCK => (ONE_WEEK_LOCK, 5, WEEK),
        TWO_WEEK_LOCK => (TWO_WEEK_LOCK, 6, 2 * WEEK),
        THREE_WEEK_LOCK => (THREE_WEEK_LOCK, 7, 3 * WEEK),
        FOUR_WEEK_LOCK => (FOUR_WEEK_LOCK, 8, 4 * WEEK),
        FOREVER_LOCK => (FOREVER_LOCK, 10, 0),
        _ => (ONE_WEEK_LOCK, 5, WEEK),
    }
}

/// Lock duration of an option, in seconds.
pub fn bound_locktime(option: u32) -> u64 {
    bound_lock_option(option).2
}

/// Commission rate chosen at candidate registration, in `SHARE_SCALE`
/// fixed point. Options carrying a plausible rate (1%..100%) are taken
/// verbatim; anything else gets the 10% default.
pub fn commission_rate(option: u32) -> u64 {
    const MIN: u64 = SHARE_SCALE / 100; // 1%
    let raw = option as u64;
    if (MIN..=SHARE_SCALE).contains(&raw) {
        raw
    } else {
        SHARE_SCALE / 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_options_have_increasing_rates() {
        let rates: Vec<u8> = [ONE_WEEK_LOCK, TWO_WEEK_LOCK, THREE_WEEK_LOCK, FOUR_WEEK_LOCK]
            .iter()
            .map(|o| bound_lock_option(*o).1)
            .collect();
        assert_eq!(rates, vec![5, 6, 7, 8]);
    }

    #[test]
    fn forever_lock_has_no_locktime() {
        let (opt, rate, locktime) = bound_lock_option(FOREVER_LOCK);
        assert_eq!(opt, FOREVER_LOCK);
        assert_eq!(rate, 10);
        assert_eq!(locktime, 0);
    }

    #[test]
    fn unknown_option_falls_back_to_one_week() {
        assert_eq!(bound_lock_option(42), bound_lock_option(ONE_WEEK_LOCK));
    }

    #[test]
    fn one_week_locktime() {
        assert_eq!(bound_locktime(ONE_WEEK_LOCK), 604_800);
    }

    #[test]
    fn commission_defaults_to_ten_percent() {
        assert_eq!(commission_rate(0), SHARE_SCALE / 10);
        assert_eq!(commission_rate(u32::MAX), SHARE_SCALE / 10);
    }

    #[test]
    fn explicit_commission_taken_verbatim() {
        assert_eq!(commission_rate(200_000_000), 200_000_000);
        assert_eq!(commission_rate(SHARE_SCALE as u32), SHARE_SCALE);
    }
}
