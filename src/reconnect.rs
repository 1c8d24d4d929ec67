//! Reconnect backoff utilities.
//!
//! The transport runner sleeps between connection attempts according to a
//! [`ReconnectPolicy`]: exponential delay growth bounded by a cap, plus
//! lightweight clock-derived jitter.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default delay before the first reconnect attempt.
pub const MIN_RECONNECT_BACKOFF: Duration = Duration::from_millis(100);
/// Default upper bound for reconnect delay growth.
pub const MAX_RECONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Policy controlling the delay between reconnect attempts.
#[derive(Clone, Debug)]
pub struct ReconnectPolicy {
    /// Delay used before the first reconnect.
    pub initial_backoff: Duration,
    /// Upper bound for exponential delay growth.
    pub max_backoff: Duration,
    /// Maximum random jitter added to each delay.
    pub jitter: Duration,
}

impl ReconnectPolicy {
    /// Computes the delay to apply before the given reconnect attempt.
    ///
    /// `attempt` is 1-based; attempt 1 uses `initial_backoff` and each later
    /// attempt doubles the delay up to `max_backoff`.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let mut delay = self.initial_backoff;
        for _ in 1..attempt {
            delay = std::cmp::min(delay.saturating_mul(2), self.max_backoff);
        }
        delay + jitter_duration(self.jitter, attempt)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: MIN_RECONNECT_BACKOFF,
            max_backoff: MAX_RECONNECT_BACKOFF,
            jitter: Duration::from_millis(25),
        }
    }
}

fn jitter_duration(max_jitter: Duration, attempt: usize) -> Duration {
    if max_jitter.is_zero() {
        return Duration::ZERO;
    }

    let limit_nanos = max_jitter.as_nanos().min(u64::MAX as u128) as u64;
    if limit_nanos == 0 {
        return Duration::ZERO;
    }

    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    let mixed = now_nanos ^ ((attempt as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    Duration::from_nanos(mixed % (limit_nanos + 1))
}
