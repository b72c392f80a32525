use super::constants::{self, headers};
use super::envelope::ApiResponse;
use super::error::{ApiError, extract_message};
use super::resilience::{
    ApiLogger, MetricsCollector, MetricsSnapshot, OperationMetrics, RateLimiter, RateLimiterStats,
    ResilienceConfig, RetryPolicy, is_idempotent,
};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Calls slower than this are logged as warnings
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(5);

/// HTTP client for the drilling backend.
///
/// Cloning is cheap and clones share the connection pool, rate limiter and
/// metrics.
#[derive(Debug, Clone)]
pub struct ForageClient {
    base_url: String,
    http_client: reqwest::Client,
    token: Option<String>,
    retry_policy: RetryPolicy,
    rate_limiter: RateLimiter,
    api_logger: ApiLogger,
    metrics_collector: MetricsCollector,
    correlation_ids: bool,
}

/// Raw result of a call once retries are over
struct RawResponse {
    url: String,
    status: reqwest::StatusCode,
    body: String,
}

impl ForageClient {
    pub fn new(base_url: &str, resilience: ResilienceConfig, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            token: None,
            retry_policy: RetryPolicy::new(resilience.retry.clone()),
            rate_limiter: RateLimiter::new(resilience.rate_limit.clone()),
            api_logger: ApiLogger::new(resilience.monitoring.clone()),
            metrics_collector: MetricsCollector::new(resilience.monitoring.clone()),
            correlation_ids: resilience.monitoring.correlation_ids,
        })
    }

    /// Send `Authorization: Bearer <token>` on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics_collector.snapshot()
    }

    pub fn rate_limiter_stats(&self) -> RateLimiterStats {
        self.rate_limiter.stats()
    }

    /// GET and unwrap the envelope; `data` must be present
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let data = self.call(Method::GET, path, &[], None).await?;
        require(data, path)
    }

    pub async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let data = self.call(Method::GET, path, query, None).await?;
        require(data, path)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let data = self.call(Method::POST, path, &[], Some(to_value(path, body)?)).await?;
        require(data, path)
    }

    /// POST where the envelope may come back without `data`
    pub async fn post_optional<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.call(Method::POST, path, &[], Some(to_value(path, body)?)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let data = self.call(Method::PUT, path, &[], Some(to_value(path, body)?)).await?;
        require(data, path)
    }

    /// DELETE; the envelope must report success but may carry no data
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call::<Value>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// POST where only the HTTP status decides success
    pub async fn post_accepted<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let raw = self
            .send(Method::POST, path, &[], Some(to_value(path, body)?))
            .await?;
        if raw.status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Http {
                status: raw.status.as_u16(),
                message: extract_message(&raw.body, raw.status),
            })
        }
    }

    /// Send a request and interpret the envelope, returning its `data`
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Option<T>, ApiError> {
        let raw = self.send(method, path, query, body).await?;

        if !raw.status.is_success() {
            return Err(ApiError::Http {
                status: raw.status.as_u16(),
                message: extract_message(&raw.body, raw.status),
            });
        }

        // DELETE endpoints sometimes answer 204 with no body
        if raw.body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&raw.body).map_err(|e| ApiError::Decode {
            url: raw.url.clone(),
            reason: e.to_string(),
        })?;

        envelope.into_result().map_err(|message| ApiError::Rejected { message })
    }

    /// The request pipeline shared by every verb: rate limit, correlation id,
    /// logging, retried send, metrics.
    ///
    /// POSTs are resent only when the backend cannot have handled them.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resource = constants::resource_name(path);
        let correlation_id = uuid::Uuid::new_v4().to_string();

        let context = self
            .api_logger
            .start_operation(method.as_str(), resource, &correlation_id);

        let rate_limit_delay = self.rate_limiter.acquire().await;
        if !rate_limit_delay.is_zero() {
            self.api_logger.log_rate_limit(&context, rate_limit_delay);
        }

        self.api_logger.log_request(&context, &url, body.as_ref());

        let request_start = std::time::Instant::now();
        let outcome = self
            .retry_policy
            .execute(is_idempotent(&method), || {
                let mut request = self.http_client.request(method.clone(), &url);
                if self.correlation_ids {
                    request = request.header(headers::X_CORRELATION_ID, &correlation_id);
                }
                if let Some(token) = &self.token {
                    request = request.bearer_auth(token);
                }
                if !query.is_empty() {
                    request = request.query(query);
                }
                if let Some(body) = &body {
                    request = request.json(body);
                }
                request.send()
            })
            .await;
        let request_duration = request_start.elapsed();

        let result = match outcome.result {
            Ok(response) => {
                let status = response.status();
                self.api_logger
                    .log_response(&context, status.as_u16(), request_duration);
                match response.text().await {
                    Ok(body) => Ok(RawResponse { url: url.clone(), status, body }),
                    Err(source) => Err(ApiError::Transport { url: url.clone(), source }),
                }
            }
            Err(source) => Err(ApiError::Transport { url: url.clone(), source }),
        };

        let metrics = OperationMetrics {
            duration: context.elapsed(),
            attempts: outcome.attempts,
            success: matches!(&result, Ok(raw) if raw.status.is_success()),
            status_code: result.as_ref().ok().map(|raw| raw.status.as_u16()),
            error_message: result.as_ref().err().map(|e| e.to_string()),
            rate_limit_delay,
        };
        if metrics.duration > SLOW_REQUEST_THRESHOLD {
            self.api_logger
                .log_performance_warning(&context, metrics.duration, SLOW_REQUEST_THRESHOLD);
        }
        self.api_logger.complete_operation(&context, &metrics);
        self.metrics_collector
            .record_operation(method.as_str(), resource, &metrics);

        result
    }
}

fn require<T>(data: Option<T>, path: &str) -> Result<T, ApiError> {
    data.ok_or_else(|| ApiError::MissingData {
        what: format!("data for {}", path),
    })
}

fn to_value<B: Serialize>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        url: path.to_string(),
        reason: format!("request body could not be serialized: {}", e),
    })
}
