// src/rate_limit.rs
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed-spacing limiter: permits are handed out no closer than
/// `min_interval` apart. No burst allowance.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// `n` permits per second. `n == 0` is treated as 1.
    pub fn per_second(n: u32) -> Self {
        Self::new(Duration::from_secs(1) / n.max(1))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next permit is available. Cancel-safe: dropping the
    /// future before it resolves does not consume a slot.
    pub async fn acquire(&self) {
        let mut next = self.next_slot.lock().await;
        if let Some(at) = *next {
            if at > Instant::now() {
                tracing::trace!(
                    wait_ms = at.saturating_duration_since(Instant::now()).as_millis() as u64,
                    "rate limiter: waiting for slot"
                );
                tokio::time::sleep_until(at).await;
            }
        }
        *next = Some(Instant::now() + self.min_interval);
    }
}
