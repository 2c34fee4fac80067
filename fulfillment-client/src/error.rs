//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Error body the provider attaches to 4xx/5xx responses
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Provider returned an HTTP error response. Never retried.
    #[error("provider error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Connection-level failure (connect, timeout, TLS). Retried per policy.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a raw error response body.
    ///
    /// Falls back to a generic message when the body is not the provider's
    /// JSON error shape, so the error path itself cannot fail.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ProviderErrorBody>(body) {
            Ok(parsed) => Self::Api {
                status,
                message: parsed.message,
                code: parsed.code,
            },
            Err(_) => Self::Api {
                status,
                message: format!("provider error: {status}"),
                code: None,
            },
        }
    }

    /// Provider HTTP status, if this is an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_parsed_when_json() {
        let err = ClientError::from_error_body(
            400,
            r#"{"message":"Product uid not found","code":"invalid_product","details":{"uid":"x"}}"#,
        );
        match err {
            ClientError::Api {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Product uid not found");
                assert_eq!(code.as_deref(), Some("invalid_product"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_body_falls_back_on_non_json() {
        let err = ClientError::from_error_body(502, "<html>Bad Gateway</html>");
        match err {
            ClientError::Api {
                status,
                message,
                code,
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "provider error: 502");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_body_falls_back_on_missing_message() {
        let err = ClientError::from_error_body(500, r#"{"oops":true}"#);
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("provider error: 500"));
    }
}
