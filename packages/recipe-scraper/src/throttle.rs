//! Minimum-interval request throttling.
//!
//! Wraps a governor rate limiter with a quota of one request per interval
//! and no burst.

use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::sync::Arc;
use std::time::Duration;

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Spaces requests at least `interval` apart.
///
/// Clones share the same limiter. A zero interval disables throttling.
#[derive(Clone, Default)]
pub struct RequestThrottle {
    limiter: Option<Arc<DefaultRateLimiter>>,
    interval: Duration,
}

impl RequestThrottle {
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(nonzero!(1u32)))));

        Self { limiter, interval }
    }

    /// A throttle that never waits.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request is allowed.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("interval", &self.interval)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_spaces_requests() {
        let throttle = RequestThrottle::new(Duration::from_millis(200));

        let start = Instant::now();
        for _ in 0..3 {
            throttle.wait().await;
        }
        let elapsed = start.elapsed();

        // First is immediate, the next two wait one interval each
        assert!(elapsed >= Duration::from_millis(350), "Throttle not working: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let throttle = RequestThrottle::new(Duration::from_millis(200));
        let other = throttle.clone();

        let start = Instant::now();
        throttle.wait().await;
        other.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_zero_interval_disabled() {
        let throttle = RequestThrottle::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..10 {
            throttle.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
