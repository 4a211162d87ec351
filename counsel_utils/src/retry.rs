//! Bounded retries with linear backoff.

use std::time::Duration;

/// Number of retries after the first attempt and the base delay between
/// them.
///
/// The delay before retry `n` (starting at 1) is `base_delay * n`, so a
/// policy with a base delay of one second waits 1s, 2s, 3s, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Returns the delay to wait before retry number `retry`, or `None` if
    /// the retry budget does not cover it or the delay is not representable.
    pub fn delay(&self, retry: u32) -> Option<Duration> {
        (1..=self.max_retries)
            .contains(&retry)
            .then(|| self.base_delay.checked_mul(retry))
            .flatten()
    }

    /// Number of retries that remain after `retries_used` retries.
    pub fn remaining(&self, retries_used: u32) -> u32 {
        self.max_retries.saturating_sub(retries_used)
    }
}
