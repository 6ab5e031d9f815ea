//! Fixed-delay throttle between live API calls.

use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;

/// Sleeps for a fixed quantum after every call that reached the network.
///
/// Responses served from the cache pass straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    delay: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl RateLimiter {
    /// Create a limiter pausing for `delay`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The pause applied after a live call.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pause if the last response did not come from the cache.
    pub async fn after_fetch(&self, from_cache: bool) {
        if from_cache || self.delay.is_zero() {
            return;
        }
        trace!("Throttling for {:?}", self.delay);
        sleep(self.delay).await;
    }
}
