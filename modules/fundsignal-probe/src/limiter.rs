//! Client-side rate limiting for search API calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Token bucket: `burst` tokens that refill at `cps` per second. One call
/// takes one token; a dry bucket sleeps until the next token accrues.
/// Shared by reference across concurrent searches.
pub struct RateLimiter {
    state: Mutex<Bucket>,
    cps: f64,
    burst: f64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Non-positive rates and sub-1 bursts are clamped to sane minimums.
    pub fn new(cps: f64, burst: f64) -> Self {
        let cps = if cps > 0.0 { cps } else { 1.0 };
        let burst = if burst >= 1.0 { burst } else { 1.0 };
        Self {
            state: Mutex::new(Bucket { tokens: burst, last_refill: Instant::now() }),
            cps,
            burst,
        }
    }

    /// Take one token, sleeping while the bucket is dry. The lock is not
    /// held across the sleep, so concurrent callers queue fairly.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.state.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.cps).min(self.burst);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.cps)
            };
            tokio::time::sleep(wait).await;
        }
    }
}
