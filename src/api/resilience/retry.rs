//! Backoff for calls that hit a restarting or throttled backend.
//!
//! Only failures that say nothing about the request itself are retried: lost
//! connections, timeouts, throttling and the gateway statuses a reverse proxy
//! returns while the server is down. A 500 means the backend ran the request
//! and failed, so it is returned as is.

use log::{debug, info, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total tries, the first one included
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread each delay over 50% to 150% of its nominal value
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Two slow tries, for a backend shared by a whole site
    pub fn patient() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_secs(1),
            backoff_multiplier: 1.5,
            ..Self::default()
        }
    }

    /// Quick repeated tries for a backend on the same machine
    pub fn eager() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.5,
            jitter: true,
        }
    }

    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }

    /// Wait before try `attempt + 1`, without jitter
    fn nominal_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        let millis = (self.base_delay.as_millis() as f64 * factor).min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }
}

/// Why a call did not succeed, as far as retrying is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Connection refused or DNS failure; nothing reached the backend
    Connection,
    /// The connection broke after the request started going out
    Interrupted,
    /// 408 or the client-side timeout
    Timeout,
    /// 429
    Throttled,
    /// 502, 503 or 504 from the proxy in front of the backend
    Unavailable(u16),
    /// Any other 5xx
    ServerFault(u16),
    /// 401 or 403
    Unauthorized(u16),
    /// Any other 4xx
    BadRequest(u16),
    Other,
}

impl Failure {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Failure::Unauthorized(status),
            408 => Failure::Timeout,
            429 => Failure::Throttled,
            400..=499 => Failure::BadRequest(status),
            502..=504 => Failure::Unavailable(status),
            500..=599 => Failure::ServerFault(status),
            _ => Failure::Other,
        }
    }

    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            Failure::Connection
        } else if error.is_timeout() {
            Failure::Timeout
        } else if error.is_request() {
            Failure::Interrupted
        } else {
            error
                .status()
                .map(|status| Self::from_status(status.as_u16()))
                .unwrap_or(Failure::Other)
        }
    }

    /// Whether the same request might succeed a moment later
    pub fn is_transient(self) -> bool {
        match self {
            Failure::Connection
            | Failure::Interrupted
            | Failure::Timeout
            | Failure::Throttled
            | Failure::Unavailable(_) => true,
            // 505 and above are proxy-level too
            Failure::ServerFault(status) => status > 504,
            Failure::Unauthorized(_) | Failure::BadRequest(_) | Failure::Other => false,
        }
    }

    /// Whether the backend certainly did not act on the request, so that
    /// even a non-idempotent call can be sent again
    pub fn is_unhandled(self) -> bool {
        matches!(
            self,
            Failure::Connection | Failure::Throttled | Failure::Unavailable(503)
        )
    }

    fn allows_resend(self, idempotent: bool) -> bool {
        if idempotent {
            self.is_transient()
        } else {
            self.is_unhandled()
        }
    }
}

/// GET, HEAD, PUT and DELETE can be repeated without side effects
pub fn is_idempotent(method: &reqwest::Method) -> bool {
    [
        reqwest::Method::GET,
        reqwest::Method::HEAD,
        reqwest::Method::PUT,
        reqwest::Method::DELETE,
    ]
    .contains(method)
}

/// Last result of a retried send and how many tries it took
#[derive(Debug)]
pub struct RetryOutcome {
    pub result: Result<reqwest::Response, reqwest::Error>,
    pub attempts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Send until the outcome is final or the attempts are used up.
    ///
    /// With `idempotent` false only failures the backend never acted on are
    /// retried. The last response is handed back even when its status is an
    /// error so the caller can still read the server's message.
    pub async fn execute<F, Fut>(&self, idempotent: bool, mut send: F) -> RetryOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Sending request (attempt {}/{})", attempt, max_attempts);
            let result = send().await;

            let failure = match &result {
                Ok(response) if response.status().is_success() => None,
                Ok(response) => Some(Failure::from_status(response.status().as_u16())),
                Err(error) => Some(Failure::from_transport(error)),
            };

            let Some(failure) = failure.filter(|f| f.allows_resend(idempotent)) else {
                if attempt > 1 && result.as_ref().is_ok_and(|r| r.status().is_success()) {
                    info!("Request succeeded on attempt {}", attempt);
                }
                return RetryOutcome { result, attempts: attempt };
            };

            if attempt >= max_attempts {
                warn!("Giving up after {} attempts: {:?}", attempt, failure);
                return RetryOutcome { result, attempts: attempt };
            }

            let delay = self.delay_before_retry(attempt);
            warn!("Attempt {} hit {:?}, retrying in {:?}", attempt, failure, delay);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn delay_before_retry(&self, attempt: u32) -> Duration {
        let delay = self.config.nominal_delay(attempt);
        if self.config.jitter {
            delay.mul_f64(rand::rng().random_range(0.5..=1.5))
        } else {
            delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(base_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_gateway_errors_are_transient() {
        for status in [502, 503, 504] {
            assert!(Failure::from_status(status).is_transient(), "{}", status);
        }
        assert!(Failure::from_status(429).is_transient());
        assert!(Failure::from_status(408).is_transient());
        assert!(Failure::Connection.is_transient());
    }

    #[test]
    fn test_backend_faults_are_final() {
        assert_eq!(Failure::from_status(500), Failure::ServerFault(500));
        assert!(!Failure::from_status(500).is_transient());
        assert!(!Failure::from_status(501).is_transient());
        assert_eq!(Failure::from_status(403), Failure::Unauthorized(403));
        assert!(!Failure::from_status(404).is_transient());
        assert!(!Failure::from_status(401).is_transient());
    }

    #[test]
    fn test_only_unhandled_failures_resend_a_post() {
        assert!(Failure::Connection.allows_resend(false));
        assert!(Failure::Throttled.allows_resend(false));
        assert!(Failure::from_status(503).allows_resend(false));

        assert!(!Failure::Timeout.allows_resend(false));
        assert!(!Failure::Interrupted.allows_resend(false));
        assert!(!Failure::from_status(502).allows_resend(false));
        assert!(!Failure::from_status(504).allows_resend(false));

        assert!(Failure::Timeout.allows_resend(true));
        assert!(Failure::from_status(504).allows_resend(true));
    }

    #[test]
    fn test_idempotent_methods() {
        assert!(is_idempotent(&reqwest::Method::GET));
        assert!(is_idempotent(&reqwest::Method::PUT));
        assert!(is_idempotent(&reqwest::Method::DELETE));
        assert!(!is_idempotent(&reqwest::Method::POST));
        assert!(!is_idempotent(&reqwest::Method::PATCH));
    }

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy::new(fixed(100, 350));
        assert_eq!(policy.delay_before_retry(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before_retry(2), Duration::from_millis(200));
        assert_eq!(policy.delay_before_retry(3), Duration::from_millis(350));
        assert_eq!(policy.delay_before_retry(9), Duration::from_millis(350));
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = RetryPolicy::new(RetryConfig {
            jitter: true,
            backoff_multiplier: 1.0,
            ..fixed(1000, 10_000)
        });
        for _ in 0..50 {
            let delay = policy.delay_before_retry(1);
            assert!(delay >= Duration::from_millis(500) && delay <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(RetryConfig::patient().max_attempts, 2);
        assert_eq!(RetryConfig::patient().max_delay, RetryConfig::default().max_delay);
        assert_eq!(RetryConfig::eager().max_attempts, 5);
        assert_eq!(RetryConfig::none().nominal_delay(3), Duration::ZERO);
    }
}
