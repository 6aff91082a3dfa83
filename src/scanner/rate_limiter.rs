//! Scanner-wide rate limiting.
//!
//! Token bucket limiter shared by every scan on one scanner. It sits on top
//! of the per-scan pacer and caps the total dispatch rate when several scans
//! run at once.

use governor::{DefaultDirectRateLimiter, Quota};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// A cloneable handle to a shared token bucket.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` dispatches per second, with no
    /// burst beyond a single token.
    ///
    /// Returns `None` for a rate of 0, meaning unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        let quota = Quota::per_second(rate).allow_burst(NonZeroU32::MIN);

        Some(Self {
            limiter: Arc::new(DefaultDirectRateLimiter::direct(quota)),
        })
    }

    /// Wait until a token is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
