//! Retries, rate limiting and request monitoring for backend calls

pub mod config;
pub mod logging;
pub mod metrics;
pub mod rate_limiter;
pub mod retry;

pub use config::{LogLevel, MonitoringConfig, RateLimitConfig, ResilienceConfig, ResilienceProfile};
pub use logging::{ApiLogger, OperationContext, OperationMetrics};
pub use metrics::{CallCounts, MetricsCollector, MetricsSnapshot, ResourceMetrics};
pub use rate_limiter::{RateLimiter, RateLimiterStats};
pub use retry::{Failure, RetryConfig, RetryOutcome, RetryPolicy, is_idempotent};
