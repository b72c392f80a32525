use serde::Deserialize;

/// Message used when a rejected envelope carries none
pub const REJECTED_FALLBACK: &str = "request rejected";

/// Wrapper every backend response body comes in
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// `data` of a successful envelope, `Err(message)` for a rejected one
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_data() {
        let envelope: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2],"message":null}"#).unwrap();
        assert_eq!(envelope.into_result(), Ok(Some(vec![1, 2])));
    }

    #[test]
    fn test_rejection_message() {
        let envelope: ApiResponse<i64> =
            serde_json::from_str(r#"{"success":false,"message":"Forage introuvable"}"#).unwrap();
        assert_eq!(envelope.into_result(), Err("Forage introuvable".to_string()));

        let envelope: ApiResponse<i64> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(envelope.into_result(), Err("request rejected".to_string()));
    }

    #[test]
    fn test_null_data() {
        let envelope: ApiResponse<i64> = serde_json::from_str(r#"{"success":true,"data":null}"#).unwrap();
        assert_eq!(envelope.into_result(), Ok(None));
    }
}
