//! Per-client token-bucket rate limiter.
//!
//! A proper token bucket, keyed per client rather than globally, since
//! a fixed window can't express "~10 req/s, configurable" cleanly. The
//! bucket refills continuously rather than in discrete windows, so a
//! burst followed by silence doesn't stall the next caller for up to a
//! full window.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct Bucket {
    tokens: f64,
    capacity: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }
}

/// Shared across all calls made by one client; not global.
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// `per_sec` is both the refill rate and the bucket capacity (one
    /// second's worth of burst).
    pub fn new(per_sec: f64) -> Self {
        let per_sec = if per_sec > 0.0 { per_sec } else { 10.0 };
        Self {
            bucket: Mutex::new(Bucket {
                tokens: per_sec,
                capacity: per_sec,
                refill_per_sec: per_sec,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Acquires one token, waiting if the bucket is currently empty.
    /// Honors cancellation: if the calling future is dropped while
    /// sleeping, the wait simply never completes its side effect.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                bucket.refill(now);
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    None
                } else {
                    let deficit = 1.0 - bucket.tokens;
                    Some(Duration::from_secs_f64(deficit / bucket.refill_per_sec))
                }
            };

            match wait {
                None => return,
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_a_full_second_worth_of_burst() {
        let limiter = RateLimiter::new(5.0);
        for _ in 0..5 {
            limiter.acquire().await;
        }
    }

    #[tokio::test]
    async fn exhausting_the_bucket_forces_a_wait() {
        let limiter = RateLimiter::new(100.0);
        for _ in 0..100 {
            limiter.acquire().await;
        }
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
