//! Retry policy for rate-limited provider calls.

use rand::Rng;
use std::time::Duration;

/// Exponential backoff with jitter, bounded by a fixed attempt count.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Default: 3.
    pub max_attempts: u32,

    /// Multiplied by `2^attempt`. Default: 1s.
    pub base_delay: Duration,

    /// Uniform jitter added on top. Default: 1s.
    pub max_jitter: Duration,

    /// Upper bound for any single wait, provider hints included. Default: 30s.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait before retrying after the given (1-based) failed attempt.
    ///
    /// A provider hint wins over the computed delay but is still clamped to
    /// `max_delay`. A hint above the cap therefore retries before the
    /// provider asked to; a further 429 just spends another attempt, and
    /// `max_attempts` bounds the total wait.
    pub fn backoff<R: Rng>(
        &self,
        attempt: u32,
        hint: Option<Duration>,
        rng: &mut R,
    ) -> Duration {
        if let Some(hint) = hint {
            return hint.min(self.max_delay);
        }

        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rng.gen_range(0..=jitter_ms))
        };

        exp.saturating_add(jitter).min(self.max_delay)
    }
}
