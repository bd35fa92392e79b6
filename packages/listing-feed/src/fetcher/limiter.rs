//! Minimum-spacing rate limiter backed by `governor`.
//!
//! The provider publishes a request ceiling; we stay under it with a GCRA
//! quota of one request per `min_spacing` and no burst. Time comes from the
//! injected [`Clock`], so tests drive pacing on virtual time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::Clock as GovernorClock;
use governor::middleware::NoOpMiddleware;
use governor::nanos::Nanos;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use tokio::time::Instant;

use crate::traits::Clock;

/// Default gap between requests; roughly the provider's published ceiling.
pub const DEFAULT_MIN_SPACING: Duration = Duration::from_millis(1500);

type SpacingLimiter =
    governor::RateLimiter<NotKeyed, InMemoryState, PacingClock, NoOpMiddleware<Nanos>>;

/// Exposes an injected [`Clock`] to governor as nanoseconds since `origin`.
#[derive(Clone)]
struct PacingClock {
    clock: Arc<dyn Clock>,
    origin: Instant,
}

impl GovernorClock for PacingClock {
    type Instant = Nanos;

    fn now(&self) -> Nanos {
        Nanos::from(self.clock.now().saturating_duration_since(self.origin))
    }
}

pub struct RateLimiter {
    /// `None` when spacing is zero: nothing to pace.
    limiter: Option<SpacingLimiter>,
    pacing: PacingClock,
}

impl RateLimiter {
    pub fn new(min_spacing: Duration, clock: Arc<dyn Clock>) -> Self {
        let pacing = PacingClock {
            origin: clock.now(),
            clock,
        };
        let limiter = Quota::with_period(min_spacing)
            .map(|quota| governor::RateLimiter::direct_with_clock(quota, &pacing));

        Self { limiter, pacing }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.pacing.clock
    }

    /// Wait until a request may be issued.
    ///
    /// Concurrent callers that lose the race for a cell re-check after
    /// sleeping, so each request still gets its own slot.
    pub async fn acquire(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };

        while let Err(not_until) = limiter.check() {
            let wait = not_until.wait_time_from(self.pacing.now());
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Pacing request");
            self.pacing.clock.sleep(wait).await;
        }
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("paced", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// How far one spacing clock reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimiterScope {
    /// Every session shares one clock: the aggregate request rate is capped.
    #[default]
    Shared,
    /// Each session paces itself independently.
    PerSession,
}

impl fmt::Display for LimiterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimiterScope::Shared => f.write_str("shared"),
            LimiterScope::PerSession => f.write_str("per_session"),
        }
    }
}

impl FromStr for LimiterScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" | "process" => Ok(LimiterScope::Shared),
            "per_session" | "per-session" | "session" => Ok(LimiterScope::PerSession),
            other => Err(format!("unknown limiter scope: {other}")),
        }
    }
}

/// Hands out the limiter a new session should use, according to its scope.
pub struct LimiterRegistry {
    scope: LimiterScope,
    min_spacing: Duration,
    clock: Arc<dyn Clock>,
    shared: Arc<RateLimiter>,
}

impl LimiterRegistry {
    pub fn new(scope: LimiterScope, min_spacing: Duration, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(RateLimiter::new(min_spacing, clock.clone()));
        Self {
            scope,
            min_spacing,
            clock,
            shared,
        }
    }

    pub fn scope(&self) -> LimiterScope {
        self.scope
    }

    pub fn for_session(&self) -> Arc<RateLimiter> {
        match self.scope {
            LimiterScope::Shared => self.shared.clone(),
            LimiterScope::PerSession => {
                Arc::new(RateLimiter::new(self.min_spacing, self.clock.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;

    #[tokio::test]
    async fn first_request_is_immediate() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Duration::from_millis(1500), clock.clone());

        limiter.acquire().await;

        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn back_to_back_requests_are_spaced() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Duration::from_millis(1500), clock.clone());

        limiter.acquire().await;
        clock.advance(Duration::from_millis(400));
        limiter.acquire().await;
        limiter.acquire().await;

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(1100), Duration::from_millis(1500)]
        );
    }

    #[tokio::test]
    async fn idle_gap_needs_no_wait() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Duration::from_millis(1500), clock.clone());

        limiter.acquire().await;
        clock.advance(Duration::from_secs(5));
        limiter.acquire().await;

        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn zero_spacing_never_waits() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Duration::ZERO, clock.clone());

        for _ in 0..5 {
            limiter.acquire().await;
        }

        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn concurrent_callers_get_distinct_slots() {
        let clock = Arc::new(MockClock::new());
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1), clock.clone()));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Three cells one second apart: two seconds of virtual time at least.
        assert!(clock.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn shared_scope_reuses_limiter() {
        let clock: Arc<dyn Clock> = Arc::new(MockClock::new());
        let registry = LimiterRegistry::new(LimiterScope::Shared, DEFAULT_MIN_SPACING, clock);

        assert!(Arc::ptr_eq(&registry.for_session(), &registry.for_session()));
    }

    #[tokio::test]
    async fn per_session_scope_isolates_clocks() {
        let clock: Arc<dyn Clock> = Arc::new(MockClock::new());
        let registry =
            LimiterRegistry::new(LimiterScope::PerSession, DEFAULT_MIN_SPACING, clock);

        assert!(!Arc::ptr_eq(&registry.for_session(), &registry.for_session()));
    }

    #[test]
    fn scope_parses() {
        assert_eq!("shared".parse::<LimiterScope>(), Ok(LimiterScope::Shared));
        assert_eq!(
            "Per_Session".parse::<LimiterScope>(),
            Ok(LimiterScope::PerSession)
        );
        assert!("global".parse::<LimiterScope>().is_err());
        assert_eq!(LimiterScope::PerSession.to_string(), "per_session");
    }
}
