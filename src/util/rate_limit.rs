//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Create a rate limiter with the specified requests per second
pub fn create_limiter(requests_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Default cap on debris requests a host accepts from its joiner
pub const DEBRIS_RATE_LIMIT: u32 = 10; // Max 10 debris spawns per second

/// Host-side limiter for debris relayed from the joiner
#[derive(Clone)]
pub struct DebrisRateLimiter {
    limiter: Arc<Limiter>,
}

impl DebrisRateLimiter {
    pub fn new(per_second: u32) -> Self {
        Self {
            limiter: create_limiter(per_second),
        }
    }

    /// Check if one more debris body may enter the world (returns true if allowed)
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for DebrisRateLimiter {
    fn default() -> Self {
        Self::new(DEBRIS_RATE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_beyond_quota_is_rejected() {
        let limiter = DebrisRateLimiter::new(3);
        let allowed = (0..5).filter(|_| limiter.check()).count();
        assert_eq!(allowed, 3);
    }

    #[test]
    fn zero_quota_still_allows_one() {
        let limiter = DebrisRateLimiter::new(0);
        assert!(limiter.check());
    }
}
