//! Contention policy for the compare-and-swap loop.

use serde::{Deserialize, Serialize};
use std::hint;
use std::thread;
use std::time::Duration;

/// How a store retries after losing a compare-and-swap race.
///
/// Lost races first spin, then yield the thread, then sleep with
/// exponentially growing pauses capped at `max_backoff`. When
/// `max_attempts` is set and exhausted the change reports a contention
/// failure instead of retrying forever.
///
/// Sleeps are blocking `thread::sleep` calls of up to `max_backoff`. A
/// change made from inside an async task holds its worker thread for
/// that long; use `spawn_blocking` or a small `max_backoff` there.
///
/// # Example
///
/// ```rust
/// use custodian::store::{Pause, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .max_attempts(8)
///     .max_backoff(Duration::from_millis(1));
///
/// assert_eq!(policy.pause_after(1), Pause::Spin(2));
/// assert!(policy.allows_retry_after(7));
/// assert!(!policy.allows_retry_after(8));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    max_attempts: Option<usize>,
    spin_limit: u32,
    yield_limit: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

/// What to do between two attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pause {
    /// Busy-wait for this many spin-loop hints.
    Spin(u32),
    /// Give up the rest of the time slice.
    Yield,
    Sleep(Duration),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(64),
            spin_limit: 4,
            yield_limit: 8,
            initial_backoff: Duration::from_micros(50),
            max_backoff: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    /// Retry until the swap succeeds. Can live-lock under sustained contention.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    /// Give up after `n` attempts in total.
    pub fn max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Number of lost races answered with spinning before yielding.
    pub fn spin_limit(mut self, n: u32) -> Self {
        self.spin_limit = n;
        self
    }

    /// Number of lost races (spins included) answered without sleeping.
    pub fn yield_limit(mut self, n: u32) -> Self {
        self.yield_limit = n;
        self
    }

    pub fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    pub fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    pub fn attempt_limit(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Whether another attempt may follow `attempts` failed ones.
    pub fn allows_retry_after(&self, attempts: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }

    /// Pause to take after the `failed`-th lost race (1-based).
    ///
    /// Pure: the same input always yields the same pause.
    pub fn pause_after(&self, failed: usize) -> Pause {
        let failed = u32::try_from(failed).unwrap_or(u32::MAX).max(1);
        if failed <= self.spin_limit {
            return Pause::Spin(1 << failed.min(10));
        }
        if failed <= self.yield_limit {
            return Pause::Yield;
        }
        let exponent = (failed - self.yield_limit - 1).min(20);
        let delay = self.initial_backoff.saturating_mul(1 << exponent);
        Pause::Sleep(delay.min(self.max_backoff))
    }

    pub(crate) fn backoff(&self) -> Backoff<'_> {
        Backoff {
            policy: self,
            failed: 0,
        }
    }
}

impl Pause {
    fn wait(self) {
        match self {
            Pause::Spin(n) => {
                for _ in 0..n {
                    hint::spin_loop();
                }
            }
            Pause::Yield => thread::yield_now(),
            Pause::Sleep(duration) => thread::sleep(duration),
        }
    }
}

/// Retry state for a single `change` call.
pub(crate) struct Backoff<'p> {
    policy: &'p RetryPolicy,
    failed: usize,
}

impl Backoff<'_> {
    /// 1-based number of the attempt currently in progress.
    pub(crate) fn attempt(&self) -> usize {
        self.failed + 1
    }

    /// Record a lost race and wait before the next attempt.
    ///
    /// Returns `false` without waiting when the policy allows no more attempts.
    pub(crate) fn snooze(&mut self) -> bool {
        self.failed += 1;
        if !self.policy.allows_retry_after(self.failed) {
            return false;
        }
        self.policy.pause_after(self.failed).wait();
        true
    }

    pub(crate) fn failed(&self) -> usize {
        self.failed
    }
}
