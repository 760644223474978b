//! Poll scheduling and retry policies
//!
//! Every monitor cycle asks its policy how long to wait before the next
//! attempt. Returning `None` means the monitor should give up.

use rand::Rng;
use std::time::Duration;

/// Upper bound on the random jitter added to each polling delay
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_secs(5);

/// Trait for deciding how long to wait between attempts
pub trait RetryPolicy: Send + Sync {
    /// Get the delay before the next attempt
    ///
    /// # Arguments
    /// * `attempt` - Number of consecutive failed attempts so far (0 after a success)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long, then try again
    /// * `None` - Stop retrying
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check if another attempt is allowed
    fn should_retry(&self, attempt: usize) -> bool;
}

fn within_limit(max_attempts: Option<usize>, attempt: usize) -> bool {
    max_attempts.map_or(true, |max| attempt < max)
}

/// Fixed base delay plus uniform random jitter
///
/// This is the polling cadence used against the store: spreading requests
/// keeps several monitors from hitting the API in lockstep.
#[derive(Debug, Clone)]
pub struct JitteredDelay {
    base: Duration,
    max_jitter: Duration,
    max_attempts: Option<usize>,
}

impl JitteredDelay {
    pub fn new(base: Duration, max_jitter: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            base,
            max_jitter,
            max_attempts,
        }
    }

    /// Unlimited attempts with the default five second jitter bound
    pub fn polling(base: Duration) -> Self {
        Self::new(base, DEFAULT_MAX_JITTER, None)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }

    fn jitter(&self) -> Duration {
        let bound = self.max_jitter.as_millis() as u64;
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=bound))
    }
}

impl RetryPolicy for JitteredDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        Some(self.base + self.jitter())
    }

    fn should_retry(&self, attempt: usize) -> bool {
        within_limit(self.max_attempts, attempt)
    }
}

/// Same delay every time
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl FixedDelay {
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }
}

impl RetryPolicy for FixedDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        Some(self.delay)
    }

    fn should_retry(&self, attempt: usize) -> bool {
        within_limit(self.max_attempts, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_in_bounds() {
        let policy = JitteredDelay::polling(Duration::from_millis(1000));
        for attempt in 0..200 {
            let delay = policy.next_delay(attempt).unwrap();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(6000));
        }
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let policy = JitteredDelay::new(Duration::from_millis(250), Duration::ZERO, None);
        assert_eq!(policy.next_delay(7), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_attempt_limit() {
        let policy = JitteredDelay::new(Duration::ZERO, Duration::ZERO, Some(3));
        assert!(policy.next_delay(2).is_some());
        assert!(policy.next_delay(3).is_none());
        assert!(!policy.should_retry(5));
    }

    #[test]
    fn test_fixed_delay() {
        let policy = FixedDelay::new(Duration::from_secs(2), Some(1));
        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(1), None);
    }
}
