// cafe-client/src/error.rs
// 客户端错误类型

use std::collections::HashMap;

use serde_json::Value;
use shared::error::ErrorCode;
use thiserror::Error;

/// Message shown for credential failures
pub const WRONG_CREDENTIALS_MESSAGE: &str = "Wrong username or password";
/// Message shown for every other failure
pub const SYSTEM_ERROR_MESSAGE: &str = "System error, please try again";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error returned by the server
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// A single row was expected but none matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The caller's own deadline elapsed
    #[error("Request timed out")]
    Timeout,
}

impl ClientError {
    /// Server error code, if this came from the server
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// No matching row
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::NotFound(_) => true,
            ClientError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    pub fn is_invalid_credentials(&self) -> bool {
        self.code() == Some(ErrorCode::InvalidCredentials)
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        if self.is_invalid_credentials() || self.is_not_found() {
            WRONG_CREDENTIALS_MESSAGE
        } else {
            SYSTEM_ERROR_MESSAGE
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, code: ErrorCode) -> ClientError {
        ClientError::Api {
            status,
            code,
            message: code.message().to_string(),
            details: None,
        }
    }

    #[test]
    fn test_user_message_is_flat() {
        assert_eq!(
            api(401, ErrorCode::InvalidCredentials).user_message(),
            WRONG_CREDENTIALS_MESSAGE
        );
        assert_eq!(
            ClientError::NotFound("admin".into()).user_message(),
            WRONG_CREDENTIALS_MESSAGE
        );
        assert_eq!(
            api(400, ErrorCode::GuestCountOutOfRange).user_message(),
            SYSTEM_ERROR_MESSAGE
        );
        assert_eq!(ClientError::Timeout.user_message(), SYSTEM_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_by_status() {
        assert!(api(404, ErrorCode::ProductNotFound).is_not_found());
        assert!(!api(403, ErrorCode::OperationNotAllowed).is_not_found());
    }
}
