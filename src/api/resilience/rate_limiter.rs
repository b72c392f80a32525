//! Token bucket rate limiter
//!
//! Shared by every clone of a client so the report flows, which issue many
//! sequential calls, cannot flood the backend.

use super::config::RateLimitConfig;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Bucket>>,
    config: RateLimitConfig,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
    requests_made: u64,
    requests_delayed: u64,
}

impl RateLimiter {
    /// A bucket always holds at least one token, or `acquire` could never return
    pub fn new(mut config: RateLimitConfig) -> Self {
        config.burst_capacity = config.burst_capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(Bucket {
                tokens: config.burst_capacity as f64,
                last_refill: Instant::now(),
                requests_made: 0,
                requests_delayed: 0,
            })),
            config,
        }
    }

    /// Take a token, sleeping until one is available.
    ///
    /// Returns the total time spent waiting.
    pub async fn acquire(&self) -> Duration {
        if !self.config.enabled {
            return Duration::ZERO;
        }

        let mut waited = Duration::ZERO;
        loop {
            if self.take_token() {
                return waited;
            }

            let wait = self.seconds_per_token();
            debug!("Rate limiter: waiting {:?} for next token", wait);
            sleep(wait).await;
            waited += wait;
        }
    }

    /// Take a token without waiting; false when the bucket is empty
    pub fn try_acquire(&self) -> bool {
        if !self.config.enabled {
            return true;
        }
        self.take_token()
    }

    pub fn stats(&self) -> RateLimiterStats {
        let bucket = self.inner.lock().expect("rate limiter lock poisoned");
        RateLimiterStats {
            tokens_available: bucket.tokens,
            requests_made: bucket.requests_made,
            requests_delayed: bucket.requests_delayed,
            enabled: self.config.enabled,
            requests_per_minute: self.config.requests_per_minute,
            burst_capacity: self.config.burst_capacity,
        }
    }

    pub fn reset(&self) {
        let mut bucket = self.inner.lock().expect("rate limiter lock poisoned");
        bucket.tokens = self.config.burst_capacity as f64;
        bucket.last_refill = Instant::now();
        bucket.requests_made = 0;
        bucket.requests_delayed = 0;
    }

    fn take_token(&self) -> bool {
        let mut bucket = self.inner.lock().expect("rate limiter lock poisoned");
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            bucket.requests_made += 1;
            true
        } else {
            bucket.requests_delayed += 1;
            false
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill);
        let tokens_per_second = self.config.requests_per_minute as f64 / 60.0;
        let tokens_to_add = elapsed.as_secs_f64() * tokens_per_second;

        if tokens_to_add > 0.0 {
            bucket.tokens = (bucket.tokens + tokens_to_add).min(self.config.burst_capacity as f64);
            bucket.last_refill = now;
        }
    }

    fn seconds_per_token(&self) -> Duration {
        if self.config.requests_per_minute == 0 {
            return Duration::from_secs(1);
        }
        Duration::from_secs_f64(60.0 / self.config.requests_per_minute as f64)
    }
}

#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub tokens_available: f64,
    /// Requests that got a token
    pub requests_made: u64,
    /// Times a request found the bucket empty
    pub requests_delayed: u64,
    pub enabled: bool,
    pub requests_per_minute: u32,
    pub burst_capacity: u32,
}

impl RateLimiterStats {
    pub fn delay_rate(&self) -> f64 {
        let total = self.requests_made + self.requests_delayed;
        if total == 0 {
            0.0
        } else {
            self.requests_delayed as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(rpm: u32, burst: u32, enabled: bool) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests_per_minute: rpm,
            burst_capacity: burst,
            enabled,
        })
    }

    #[tokio::test]
    async fn test_disabled_limiter_never_waits() {
        let limiter = limiter(60, 1, false);
        for _ in 0..100 {
            assert!(limiter.try_acquire());
        }
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_burst_capacity() {
        let limiter = limiter(60, 5, true);
        for _ in 0..5 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_token_refill() {
        let limiter = limiter(120, 2, true);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        tokio::time::sleep(Duration::from_millis(550)).await;
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_stats_and_reset() {
        let limiter = limiter(60, 2, true);
        limiter.try_acquire();
        limiter.try_acquire();
        limiter.try_acquire();

        let stats = limiter.stats();
        assert_eq!(stats.requests_made, 2);
        assert_eq!(stats.requests_delayed, 1);
        assert!((stats.delay_rate() - 1.0 / 3.0).abs() < 1e-9);

        limiter.reset();
        assert_eq!(limiter.stats().requests_made, 0);
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_waits_for_token() {
        let limiter = limiter(600, 1, true);
        assert_eq!(limiter.acquire().await, Duration::ZERO);

        let waited = limiter.acquire().await;
        assert!(waited >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_zero_burst_still_hands_out_tokens() {
        let limiter = limiter(600, 0, true);
        assert_eq!(limiter.stats().burst_capacity, 1);

        let waited = tokio::time::timeout(Duration::from_secs(2), async {
            limiter.acquire().await;
            limiter.acquire().await
        })
        .await
        .expect("acquire returns once the bucket refills");
        assert!(waited <= Duration::from_millis(500));
    }
}
