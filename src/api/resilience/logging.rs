//! Structured request logging with correlation ids
//!
//! Every backend call gets a context carrying its correlation id, HTTP method
//! and resource name (`phases`, `daily-reports`, ...). Events are emitted as
//! one JSON object per log line so the log file can be grepped by id.

use super::config::{LogLevel, MonitoringConfig};
use log::{debug, error, info, warn};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// Body keys whose values never reach the log file
const SENSITIVE_KEYS: &[&str] = &["password", "token", "authorization"];

#[derive(Debug, Clone)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

/// Context for a single backend call
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub correlation_id: String,
    pub method: String,
    /// First path segment of the endpoint, used to group metrics
    pub resource: String,
    pub start_time: Instant,
}

/// Outcome of one backend call
#[derive(Debug, Clone)]
pub struct OperationMetrics {
    pub duration: Duration,
    pub attempts: u32,
    pub success: bool,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub rate_limit_delay: Duration,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn start_operation(&self, method: &str, resource: &str, correlation_id: &str) -> OperationContext {
        let context = OperationContext {
            correlation_id: correlation_id.to_string(),
            method: method.to_string(),
            resource: resource.to_string(),
            start_time: Instant::now(),
        };
        if self.traces_requests() {
            debug!("call started {}", event(&context, "operation_started", json!({})));
        }
        context
    }

    /// Log the outgoing request, with credentials in the body masked
    pub fn log_request(&self, context: &OperationContext, url: &str, body: Option<&Value>) {
        if self.traces_requests() {
            let fields = json!({ "url": url, "body": body.map(redact) });
            debug!("request {}", event(context, "http_request", fields));
        }
    }

    pub fn log_response(&self, context: &OperationContext, status_code: u16, duration: Duration) {
        if !self.traces_requests() {
            return;
        }
        let line = event(
            context,
            "http_response",
            json!({ "status_code": status_code, "duration_ms": duration.as_millis() }),
        );
        if status_code >= 400 {
            warn!("error response {}", line);
        } else {
            debug!("response {}", line);
        }
    }

    pub fn log_rate_limit(&self, context: &OperationContext, delay: Duration) {
        if self.should_log(LogLevel::Debug) {
            let fields = json!({ "delay_ms": delay.as_millis() });
            debug!("throttled {}", event(context, "rate_limited", fields));
        }
    }

    pub fn complete_operation(&self, context: &OperationContext, metrics: &OperationMetrics) {
        if !self.config.performance_metrics {
            return;
        }
        let line = event(
            context,
            "operation_completed",
            json!({
                "duration_ms": metrics.duration.as_millis(),
                "attempts": metrics.attempts,
                "success": metrics.success,
                "status_code": metrics.status_code,
                "error_message": metrics.error_message,
                "rate_limit_delay_ms": metrics.rate_limit_delay.as_millis(),
            }),
        );
        if !metrics.success {
            error!("call failed {}", line);
        } else if self.should_log(LogLevel::Info) {
            info!("call completed {}", line);
        }
    }

    pub fn log_performance_warning(&self, context: &OperationContext, duration: Duration, threshold: Duration) {
        if self.config.performance_metrics && self.should_log(LogLevel::Warn) {
            let fields = json!({
                "duration_ms": duration.as_millis(),
                "threshold_ms": threshold.as_millis(),
            });
            warn!("slow call {}", event(context, "performance_warning", fields));
        }
    }

    fn traces_requests(&self) -> bool {
        self.config.request_logging && self.should_log(LogLevel::Debug)
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.log_level
    }
}

/// One log line: the call's identity plus `fields`
fn event(context: &OperationContext, name: &str, fields: Value) -> Value {
    let mut line = json!({
        "event": name,
        "correlation_id": context.correlation_id,
        "method": context.method,
        "resource": context.resource,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    if let (Value::Object(line), Value::Object(fields)) = (&mut line, fields) {
        line.extend(fields);
    }
    line
}

impl OperationContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Copy of a JSON value with sensitive fields replaced, at any depth
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let lowered = key.to_ascii_lowercase();
                    if SENSITIVE_KEYS.iter().any(|sensitive| lowered.contains(sensitive)) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_context_creation() {
        let logger = ApiLogger::new(MonitoringConfig::default());
        let context = logger.start_operation("POST", "daily-reports", "abc-123");

        assert_eq!(context.correlation_id, "abc-123");
        assert_eq!(context.method, "POST");
        assert_eq!(context.resource, "daily-reports");
    }

    #[test]
    fn test_should_log_levels() {
        let logger = ApiLogger::new(MonitoringConfig {
            log_level: LogLevel::Warn,
            ..MonitoringConfig::default()
        });

        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warn));
        assert!(!logger.should_log(LogLevel::Info));
        assert!(!logger.should_log(LogLevel::Trace));
    }

    #[test]
    fn test_event_carries_call_identity() {
        let logger = ApiLogger::new(MonitoringConfig::default());
        let context = logger.start_operation("PUT", "phases", "id-7");
        let line = event(&context, "http_response", json!({"status_code": 200}));

        assert_eq!(line["event"], "http_response");
        assert_eq!(line["correlation_id"], "id-7");
        assert_eq!(line["resource"], "phases");
        assert_eq!(line["status_code"], 200);
    }

    #[test]
    fn test_redact_masks_credentials() {
        let body = json!({
            "email": "a@b.c",
            "password": "hunter2",
            "data": {"token": "xyz", "user": {"nom": "Ali"}},
            "items": [{"Authorization": "Bearer 1"}]
        });

        let redacted = redact(&body);
        assert_eq!(redacted["email"], "a@b.c");
        assert_eq!(redacted["password"], "[REDACTED]");
        assert_eq!(redacted["data"]["token"], "[REDACTED]");
        assert_eq!(redacted["data"]["user"]["nom"], "Ali");
        assert_eq!(redacted["items"][0]["Authorization"], "[REDACTED]");
    }
}
