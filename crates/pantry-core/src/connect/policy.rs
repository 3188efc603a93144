use std::time::Duration;

/// Delays between consecutive attempts; entry `i` follows attempt `i + 1`.
pub type RetrySchedule = Vec<Duration>;

/// Exponential backoff with a cap.
///
/// Built from the `[retry]` config section; defaults give two retries after
/// 1s and 2s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    /// Delay to wait after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`, capped.
    ///
    /// Only meaningful for `attempt < max_attempts`; the acquirer never asks
    /// for a delay after the final attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        // Past 2^31 the doubling overflows u32; max_delay is the only ceiling.
        let raw = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .map_or(Duration::MAX, |factor| self.base_delay.saturating_mul(factor));
        raw.min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt`.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Full schedule: one delay per retry gap.
    pub fn schedule(&self) -> RetrySchedule {
        (1..self.max_attempts).map(|n| self.delay_for(n)).collect()
    }
}
