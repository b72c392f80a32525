//! Resilience settings for backend calls, grouped into profiles matching
//! where the backend runs.

use super::retry::RetryConfig;

#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub rate_limit: RateLimitConfig,
    pub monitoring: MonitoringConfig,
}

/// Token bucket refilled at `requests_per_minute`
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst_capacity: u32,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // A daily report submission fires a few dozen calls at once
        Self {
            requests_per_minute: 300,
            burst_capacity: 30,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    /// Send `X-Correlation-ID` and tag log lines with it
    pub correlation_ids: bool,
    pub request_logging: bool,
    pub performance_metrics: bool,
    pub log_level: LogLevel,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
            performance_metrics: true,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Where the backend runs, which decides how hard to push it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResilienceProfile {
    #[default]
    Standard,
    /// One server for the whole site: fewer retries, lower rate
    Shared,
    /// Backend on this machine: retry fast, no rate limit
    Local,
}

impl ResilienceProfile {
    pub const NAMES: [&str; 3] = ["standard", "shared", "local"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(ResilienceProfile::Standard),
            "shared" => Some(ResilienceProfile::Shared),
            "local" => Some(ResilienceProfile::Local),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResilienceProfile::Standard => "standard",
            ResilienceProfile::Shared => "shared",
            ResilienceProfile::Local => "local",
        }
    }
}

impl ResilienceConfig {
    pub fn for_profile(profile: ResilienceProfile) -> Self {
        match profile {
            ResilienceProfile::Standard => Self::default(),
            ResilienceProfile::Shared => Self {
                retry: RetryConfig::patient(),
                rate_limit: RateLimitConfig {
                    requests_per_minute: 120,
                    burst_capacity: 10,
                    enabled: true,
                },
                monitoring: MonitoringConfig {
                    log_level: LogLevel::Warn,
                    ..MonitoringConfig::default()
                },
            },
            ResilienceProfile::Local => Self {
                retry: RetryConfig::eager(),
                rate_limit: RateLimitConfig {
                    requests_per_minute: 1000,
                    burst_capacity: 100,
                    enabled: false,
                },
                monitoring: MonitoringConfig {
                    log_level: LogLevel::Debug,
                    ..MonitoringConfig::default()
                },
            },
        }
    }

    /// Single attempt, no throttling, no request logging
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::none(),
            rate_limit: RateLimitConfig {
                requests_per_minute: u32::MAX,
                burst_capacity: u32::MAX,
                enabled: false,
            },
            monitoring: MonitoringConfig {
                correlation_ids: false,
                request_logging: false,
                performance_metrics: false,
                log_level: LogLevel::Error,
            },
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.monitoring.request_logging = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_profile() {
        let config = ResilienceConfig::for_profile(ResilienceProfile::Standard);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert!(config.monitoring.correlation_ids);
    }

    #[test]
    fn test_profiles_differ() {
        let shared = ResilienceConfig::for_profile(ResilienceProfile::Shared);
        let local = ResilienceConfig::for_profile(ResilienceProfile::Local);
        assert_eq!(shared.retry.max_attempts, 2);
        assert_eq!(shared.rate_limit.requests_per_minute, 120);
        assert_eq!(local.retry.max_attempts, 5);
        assert!(!local.rate_limit.enabled);
        assert_eq!(local.monitoring.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_disabled_is_quiet() {
        let config = ResilienceConfig::disabled().with_request_logging(false);
        assert_eq!(config.retry.max_attempts, 1);
        assert!(!config.rate_limit.enabled);
        assert!(!config.monitoring.performance_metrics);
    }

    #[test]
    fn test_profile_names_round_trip() {
        for name in ResilienceProfile::NAMES {
            assert_eq!(ResilienceProfile::parse(name).map(ResilienceProfile::name), Some(name));
        }
        assert_eq!(ResilienceProfile::parse(" Shared "), Some(ResilienceProfile::Shared));
        assert_eq!(ResilienceProfile::parse("cloud"), None);
    }
}
