//! Round timers and timeout certificates.

use std::time::Duration;
use volta_messages::TimeoutCertMsg;

/// Base round interval before the first timeout.
pub const BASE_ROUND_INTERVAL: Duration = Duration::from_secs(4);

/// Cap on consecutive-timeout backoff doublings.
const MAX_BACKOFF_SHIFT: u32 = 6;

/// Tracks consecutive timeouts of the current view and derives the next
/// deadline with exponential backoff.
#[derive(Clone, Debug, Default)]
pub struct RoundTimer {
    consecutive_timeouts: u32,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The interval to wait before declaring the current round expired.
    pub fn interval(&self) -> Duration {
        let shift = self.consecutive_timeouts.min(MAX_BACKOFF_SHIFT);
        BASE_ROUND_INTERVAL * 2u32.pow(shift)
    }

    /// Record an expiry; the next interval doubles.
    pub fn on_timeout(&mut self) {
        self.consecutive_timeouts = self.consecutive_timeouts.saturating_add(1);
    }

    /// A round made progress; backoff resets.
    pub fn on_progress(&mut self) {
        self.consecutive_timeouts = 0;
    }

    pub fn timeouts(&self) -> u32 {
        self.consecutive_timeouts
    }
}

/// Accept a timeout certificate only for the expected height and a round
/// strictly before the current one.
pub fn verify_timeout_cert(
    tc: Option<&TimeoutCertMsg>,
    expected_height: u64,
    round: u64,
) -> bool {
    match tc {
        Some(tc) => tc.timeout_height == expected_height && tc.timeout_round < round,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_backs_off_and_resets() {
        let mut timer = RoundTimer::new();
        assert_eq!(timer.interval(), BASE_ROUND_INTERVAL);
        timer.on_timeout();
        assert_eq!(timer.interval(), BASE_ROUND_INTERVAL * 2);
        timer.on_timeout();
        assert_eq!(timer.interval(), BASE_ROUND_INTERVAL * 4);
        timer.on_progress();
        assert_eq!(timer.interval(), BASE_ROUND_INTERVAL);
    }

    #[test]
    fn backoff_is_capped() {
        let mut timer = RoundTimer::new();
        for _ in 0..40 {
            timer.on_timeout();
        }
        assert_eq!(timer.interval(), BASE_ROUND_INTERVAL * 64);
    }

    #[test]
    fn cert_must_match_height_and_precede_round() {
        let tc = TimeoutCertMsg {
            timeout_height: 10,
            timeout_round: 4,
        };
        assert!(verify_timeout_cert(Some(&tc), 10, 5));
        assert!(!verify_timeout_cert(Some(&tc), 11, 5));
        assert!(!verify_timeout_cert(Some(&tc), 10, 4));
        assert!(!verify_timeout_cert(Some(&tc), 10, 3));
        assert!(!verify_timeout_cert(None, 10, 5));
    }
}
