mod common;

use common::{ok, rejected};
use forage_cli::api::resilience::RetryConfig;
use forage_cli::api::{ApiError, ForageClient, ResilienceConfig};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn retrying_config() -> ResilienceConfig {
    let mut config = ResilienceConfig::disabled();
    config.retry = RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 1.0,
        jitter: false,
    };
    config.monitoring.performance_metrics = true;
    config
}

#[tokio::test]
async fn test_unavailable_backend_is_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/puits")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(3)
        .create_async()
        .await;

    let client = ForageClient::new(&server.url(), retrying_config(), Duration::from_secs(5)).unwrap();
    let err = client.puits().list().await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(503));

    let snapshot = client.metrics_snapshot();
    assert_eq!(snapshot.overall.calls, 1);
    assert_eq!(snapshot.overall.failed, 1);
    assert_eq!(snapshot.overall.retries, 2);
    assert_eq!(snapshot.resources[0].resource, "puits");
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/puits/9")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "Puit introuvable"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = ForageClient::new(&server.url(), retrying_config(), Duration::from_secs(5)).unwrap();
    let err = client.puits().get(9).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    assert_eq!(err.server_message(), "Puit introuvable");
}

#[tokio::test]
async fn test_rejected_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/phases/forage/3")
        .with_body(rejected("Forage inexistant"))
        .create_async()
        .await;

    let err = common::client(&server).phases().by_forage(3).await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.server_message(), "Forage inexistant");
}

#[tokio::test]
async fn test_token_and_query_are_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/daily-reports")
        .match_header("authorization", "Bearer abc123")
        .match_query(Matcher::UrlEncoded("puitId".into(), "4".into()))
        .with_body(ok(json!([{"id": 1, "reportName": "Day 1", "reportDate": "2024-05-01T00:00:00"}])))
        .create_async()
        .await;

    let client = common::client(&server).with_token("abc123");
    let reports = client.daily_reports().for_puit(4).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report_date.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));
}

#[tokio::test]
async fn test_missing_data_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/dashboard/data")
        .with_body(json!({"success": true}).to_string())
        .create_async()
        .await;

    let err = common::client(&server).dashboard().data().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingData { .. }));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/operations/12")
        .with_status(204)
        .create_async()
        .await;

    common::client(&server).operations().delete(12).await.unwrap();
    mock.assert_async().await;
}

/// Backend that reads each request, counts it and answers only after `delay`
async fn slow_backend(delay: Duration) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let received = Arc::new(AtomicUsize::new(0));

    let counter = received.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                if matches!(socket.read(&mut buf).await, Ok(n) if n > 0) {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(delay).await;
                let body = ok(json!({"id": 1}));
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    (url, received)
}

#[tokio::test]
async fn test_timed_out_post_is_sent_once() {
    let (url, received) = slow_backend(Duration::from_millis(700)).await;
    let client = ForageClient::new(&url, retrying_config(), Duration::from_millis(300)).unwrap();

    let result: Result<serde_json::Value, ApiError> =
        client.post("/daily-reports", &json!({"reportName": "Day 1"})).await;

    assert!(matches!(result, Err(ApiError::Transport { .. })));
    assert_eq!(received.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timed_out_get_is_retried() {
    let (url, received) = slow_backend(Duration::from_millis(700)).await;
    let client = ForageClient::new(&url, retrying_config(), Duration::from_millis(300)).unwrap();

    assert!(client.puits().list().await.is_err());
    assert_eq!(received.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_post_gateway_timeout_is_not_resent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/operations")
        .with_status(504)
        .expect(1)
        .create_async()
        .await;

    let client = ForageClient::new(&server.url(), retrying_config(), Duration::from_secs(5)).unwrap();
    let err = client
        .post::<_, serde_json::Value>("/operations", &json!({"description": "Forage 12 1/4"}))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(504));
}

#[tokio::test]
async fn test_post_service_unavailable_is_resent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/indicateurs")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = ForageClient::new(&server.url(), retrying_config(), Duration::from_secs(5)).unwrap();
    let err = client
        .post::<_, serde_json::Value>("/indicateurs", &json!({"valeur": 3}))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(503));
}
