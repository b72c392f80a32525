//! Call statistics gathered while a command runs, printed by `--stats`.

use super::config::MonitoringConfig;
use super::logging::OperationMetrics;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Latencies kept for the p95 estimate
const LATENCY_WINDOW: usize = 512;

/// Counters shared by the overall tally and each resource
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallCounts {
    pub calls: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Attempts beyond the first
    pub retries: u64,
    pub total_time: Duration,
    pub slowest: Duration,
}

impl CallCounts {
    fn add(&mut self, metrics: &OperationMetrics) {
        self.calls += 1;
        if metrics.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.retries += u64::from(metrics.attempts.saturating_sub(1));
        self.total_time += metrics.duration;
        self.slowest = self.slowest.max(metrics.duration);
    }

    fn share(&self, part: u64) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            part as f64 * 100.0 / self.calls as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.share(self.succeeded)
    }

    pub fn error_rate(&self) -> f64 {
        self.share(self.failed)
    }

    pub fn average(&self) -> Duration {
        match u32::try_from(self.calls) {
            Ok(0) => Duration::ZERO,
            Ok(calls) => self.total_time / calls,
            Err(_) => Duration::from_secs_f64(self.total_time.as_secs_f64() / self.calls as f64),
        }
    }
}

/// Calls made to one backend resource (`puits`, `phases`, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceMetrics {
    pub resource: String,
    pub counts: CallCounts,
    pub status_codes: BTreeMap<u16, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub overall: CallCounts,
    pub p95: Duration,
    /// Time spent waiting on the client-side rate limiter
    pub throttled_for: Duration,
    pub uptime: Duration,
    /// Sorted by resource name
    pub resources: Vec<ResourceMetrics>,
    pub methods: BTreeMap<String, u64>,
    pub taken_at: String,
}

#[derive(Debug)]
struct Tally {
    overall: CallCounts,
    throttled_for: Duration,
    resources: BTreeMap<String, ResourceMetrics>,
    methods: BTreeMap<String, u64>,
    latencies: Vec<Duration>,
    started: Instant,
}

impl Tally {
    fn new() -> Self {
        Self {
            overall: CallCounts::default(),
            throttled_for: Duration::ZERO,
            resources: BTreeMap::new(),
            methods: BTreeMap::new(),
            latencies: Vec::new(),
            started: Instant::now(),
        }
    }
}

/// Shared by every clone of a client
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    tally: Arc<Mutex<Tally>>,
    config: MonitoringConfig,
}

impl MetricsCollector {
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            tally: Arc::new(Mutex::new(Tally::new())),
            config,
        }
    }

    pub fn record_operation(&self, method: &str, resource: &str, metrics: &OperationMetrics) {
        if !self.config.performance_metrics {
            return;
        }

        let mut tally = self.tally.lock().expect("metrics lock poisoned");
        tally.overall.add(metrics);
        tally.throttled_for += metrics.rate_limit_delay;
        *tally.methods.entry(method.to_string()).or_default() += 1;

        let entry = tally
            .resources
            .entry(resource.to_string())
            .or_insert_with(|| ResourceMetrics {
                resource: resource.to_string(),
                counts: CallCounts::default(),
                status_codes: BTreeMap::new(),
            });
        entry.counts.add(metrics);
        if let Some(status) = metrics.status_code {
            *entry.status_codes.entry(status).or_default() += 1;
        }

        if tally.latencies.len() == LATENCY_WINDOW {
            tally.latencies.remove(0);
        }
        tally.latencies.push(metrics.duration);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let tally = self.tally.lock().expect("metrics lock poisoned");
        MetricsSnapshot {
            overall: tally.overall.clone(),
            p95: percentile(&tally.latencies, 0.95),
            throttled_for: tally.throttled_for,
            uptime: tally.started.elapsed(),
            resources: tally.resources.values().cloned().collect(),
            methods: tally.methods.clone(),
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn resource_metrics(&self, resource: &str) -> Option<ResourceMetrics> {
        let tally = self.tally.lock().expect("metrics lock poisoned");
        tally.resources.get(resource).cloned()
    }

    pub fn reset(&self) {
        *self.tally.lock().expect("metrics lock poisoned") = Tally::new();
    }
}

/// Nearest-rank percentile; zero for an empty sample
fn percentile(samples: &[Duration], quantile: f64) -> Duration {
    if samples.is_empty() {
        return Duration::ZERO;
    }

    let mut sorted = samples.to_vec();
    sorted.sort();
    let rank = (quantile * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(duration_ms: u64, status: u16, attempts: u32) -> OperationMetrics {
        OperationMetrics {
            duration: Duration::from_millis(duration_ms),
            attempts,
            success: (200..300).contains(&status),
            status_code: Some(status),
            error_message: None,
            rate_limit_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_tally_per_resource() {
        let collector = MetricsCollector::new(MonitoringConfig::default());
        collector.record_operation("GET", "phases", &call(100, 200, 1));
        collector.record_operation("PUT", "phases", &call(200, 503, 3));
        collector.record_operation("POST", "daily-reports", &call(50, 200, 1));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.overall.calls, 3);
        assert_eq!(snapshot.overall.failed, 1);
        assert_eq!(snapshot.overall.retries, 2);
        assert_eq!(snapshot.overall.slowest, Duration::from_millis(200));
        assert_eq!(snapshot.throttled_for, Duration::from_millis(15));
        assert_eq!(snapshot.resources[0].resource, "daily-reports");
        assert_eq!(snapshot.methods["GET"], 1);

        let phases = collector.resource_metrics("phases").unwrap();
        assert_eq!(phases.counts.calls, 2);
        assert_eq!(phases.counts.success_rate(), 50.0);
        assert_eq!(phases.counts.average(), Duration::from_millis(150));
        assert_eq!(phases.status_codes[&503], 1);
    }

    #[test]
    fn test_nothing_recorded_when_disabled() {
        let collector = MetricsCollector::new(MonitoringConfig {
            performance_metrics: false,
            ..MonitoringConfig::default()
        });
        collector.record_operation("GET", "puits", &call(100, 200, 1));
        assert_eq!(collector.snapshot().overall, CallCounts::default());
    }

    #[test]
    fn test_percentile() {
        let samples: Vec<Duration> = (1..=20).map(Duration::from_millis).collect();
        assert_eq!(percentile(&samples, 0.95), Duration::from_millis(19));
        assert_eq!(percentile(&[], 0.95), Duration::ZERO);
        assert_eq!(percentile(&samples[..1], 0.95), Duration::from_millis(1));
    }

    #[test]
    fn test_reset() {
        let collector = MetricsCollector::new(MonitoringConfig::default());
        collector.record_operation("GET", "puits", &call(10, 404, 1));
        assert_eq!(collector.snapshot().overall.error_rate(), 100.0);
        collector.reset();
        assert!(collector.snapshot().resources.is_empty());
        assert_eq!(collector.snapshot().overall.error_rate(), 0.0);
    }
}
