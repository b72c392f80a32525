//! Shared fixtures for the mock-backend tests
#![allow(dead_code)]

use forage_cli::api::{ForageClient, ResilienceConfig};
use serde_json::{Value, json};
use std::time::Duration;

/// Client against a mock server with retries, rate limiting and logging off
pub fn client(server: &mockito::Server) -> ForageClient {
    ForageClient::new(&server.url(), ResilienceConfig::disabled(), Duration::from_secs(5)).unwrap()
}

/// `{ "success": true, "data": ... }` as the backend sends it
pub fn ok(data: Value) -> String {
    json!({ "success": true, "data": data, "message": null }).to_string()
}

pub fn rejected(message: &str) -> String {
    json!({ "success": false, "data": null, "message": message }).to_string()
}
