//! Core error types.

use thiserror::Error;

/// Unified error type for every batch operation.
///
/// Transport failures, provider API errors, and local validation failures all
/// surface through this enum. Per-item and job-level provider errors are *not*
/// represented here; they are attached as data to `BatchResult` / `BatchItem`.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// HTTP-level failure (connection, body read, non-success without a better mapping)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Response or record could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider returned an error status
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Failure while reading a streamed body
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse error category, useful for presentation and retry decisions made by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    RateLimit,
    Client,
    Server,
    Parsing,
    Validation,
    Unsupported,
    Configuration,
    Unknown,
}

impl LlmError {
    /// Create an API error without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error carrying request/response context.
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// HTTP status code, when the error originated from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::ConnectionError(_) | Self::TimeoutError(_) => {
                ErrorCategory::Network
            }
            Self::StreamError(_) => ErrorCategory::Network,
            Self::AuthenticationError(_) | Self::MissingApiKey(_) => ErrorCategory::Authentication,
            Self::RateLimitError(_) => ErrorCategory::RateLimit,
            Self::NotFound(_) => ErrorCategory::Client,
            Self::ApiError { code, .. } => match code {
                429 => ErrorCategory::RateLimit,
                401 | 403 => ErrorCategory::Authentication,
                400..=499 => ErrorCategory::Client,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Unknown,
            },
            Self::JsonError(_) | Self::ParseError(_) => ErrorCategory::Parsing,
            Self::InvalidInput(_) | Self::InvalidParameter(_) => ErrorCategory::Validation,
            Self::UnsupportedOperation(_) => ErrorCategory::Unsupported,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::InternalError(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// This subsystem never retries by itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitError(_)
            | Self::TimeoutError(_)
            | Self::ConnectionError(_)
            | Self::HttpError(_) => true,
            Self::ApiError { code, .. } => matches!(code, 429 | 500..=599),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_categories_follow_status() {
        assert_eq!(
            LlmError::api_error(404, "Not found").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            LlmError::api_error(503, "busy").category(),
            ErrorCategory::Server
        );
        assert!(LlmError::api_error(529, "overloaded").is_retryable());
        assert!(!LlmError::api_error(400, "bad").is_retryable());
    }

    #[test]
    fn status_code_for_mapped_variants() {
        assert_eq!(
            LlmError::AuthenticationError("x".into()).status_code(),
            Some(401)
        );
        assert_eq!(LlmError::ParseError("x".into()).status_code(), None);
    }
}
