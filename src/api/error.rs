use super::envelope::REJECTED_FALLBACK;
use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("could not reach {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status; `message` is what the server said, if anything
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    /// 2xx with `success: false` in the envelope
    #[error("{message}")]
    Rejected { message: String },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("response did not contain {what}")]
    MissingData { what: String },
}

impl ApiError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's own message when it sent one, else the error text
    pub fn server_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// The server's message, or `fallback` when the server gave none
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Rejected { message } if message != REJECTED_FALLBACK => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pull a human readable message out of an error body.
///
/// Tries the JSON `message` then `error` fields, then the raw text.
pub fn extract_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                if !message.trim().is_empty() {
                    return message.trim().to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_extract_message_prefers_json_fields() {
        let body = r#"{"success":false,"message":"Phase introuvable"}"#;
        assert_eq!(extract_message(body, StatusCode::NOT_FOUND), "Phase introuvable");

        let body = r#"{"error":"Bad Request","status":400}"#;
        assert_eq!(extract_message(body, StatusCode::BAD_REQUEST), "Bad Request");
    }

    #[test]
    fn test_extract_message_falls_back() {
        assert_eq!(extract_message("upstream down", StatusCode::BAD_GATEWAY), "upstream down");
        assert_eq!(extract_message("", StatusCode::SERVICE_UNAVAILABLE), "Service Unavailable");
        assert_eq!(extract_message("{}", StatusCode::INTERNAL_SERVER_ERROR), "Internal Server Error");
    }

    #[test]
    fn test_display_and_helpers() {
        let http = ApiError::Http { status: 404, message: "Not found".into() };
        assert_eq!(http.to_string(), "Not found (HTTP 404)");
        assert_eq!(http.status(), Some(404));
        assert_eq!(http.server_message(), "Not found");
        assert!(!http.is_rejection());

        let rejected = ApiError::Rejected { message: "Email déjà utilisé".into() };
        assert!(rejected.is_rejection());
        assert_eq!(rejected.to_string(), "Email déjà utilisé");
        assert_eq!(rejected.message_or("fallback"), "Email déjà utilisé");

        let bare = ApiError::Rejected { message: REJECTED_FALLBACK.into() };
        assert_eq!(bare.message_or("Login failed"), "Login failed");
        let missing = ApiError::MissingData { what: "data for /x".into() };
        assert_eq!(missing.message_or("Login failed"), "Login failed");
    }
}
