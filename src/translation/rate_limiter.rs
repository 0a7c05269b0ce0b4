/*!
 * Client-side request pacing.
 *
 * The limiter hands out "clearance" no sooner than `min_interval` after the
 * previous grant. The last grant time sits behind an async mutex that is held
 * across the wait, so concurrent callers are served strictly one at a time.
 */

use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Suspend the current task until `deadline`. Returns immediately when the
/// deadline has already passed.
pub async fn block_until(deadline: Instant) {
    tokio::time::sleep_until(deadline).await;
}

/// Minimum-interval rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum gap between two grants
    min_interval: Duration,
    /// When clearance was last granted
    last_granted: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing `min_interval` between grants
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_granted: Mutex::new(None),
        }
    }

    /// Create a limiter that never waits
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Minimum gap between two grants
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the minimum interval since the previous grant has elapsed,
    /// then record and return the new grant time.
    pub async fn wait_for_clearance(&self) -> Instant {
        let mut last_granted = self.last_granted.lock().await;

        if let Some(previous) = *last_granted {
            let deadline = previous + self.min_interval;
            let now = Instant::now();
            if deadline > now {
                debug!("Rate limiter waiting {:?} before next request", deadline - now);
                block_until(deadline).await;
            }
        }

        let granted = Instant::now();
        *last_granted = Some(granted);
        granted
    }
}
