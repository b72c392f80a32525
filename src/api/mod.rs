//! REST client for the drilling backend

pub mod client;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod models;
pub mod resilience;
pub mod services;

pub use client::ForageClient;
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use resilience::{MetricsSnapshot, ResilienceConfig};
