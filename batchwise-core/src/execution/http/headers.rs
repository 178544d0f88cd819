//! HTTP Headers Utility
//!
//! Common utilities for building HTTP headers across providers, plus masking
//! helpers so credentials never reach a log line.

use crate::error::LlmError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, LlmError> {
        let auth_value = format!("Bearer {token}");
        self.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid API key format: {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add custom authorization header (e.g., x-api-key for Anthropic)
    pub fn with_custom_auth(self, header_name: &str, value: &str) -> Result<Self, LlmError> {
        self.with_header(header_name, value)
    }

    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!(
                    "Invalid header value for '{name}': {e}"
                ))
            })?,
        );
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, LlmError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn edge(value: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{start}...{end}")
}

/// Mask a credential-like value, keeping a short prefix and suffix.
pub fn mask_sensitive_value(value: &str) -> String {
    if let Some(token) = value.strip_prefix("Bearer ") {
        if token.chars().count() > 8 {
            return format!("Bearer {}", edge(token, 4, 4));
        }
        return "Bearer ***".to_string();
    }
    let len = value.chars().count();
    if value.starts_with("sk-") && len > 12 {
        return edge(value, 8, 4);
    }
    if len > 16 {
        edge(value, 6, 4)
    } else {
        "***".to_string()
    }
}

fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("authorization") || lower.contains("key") || lower.contains("token")
}

/// Render headers for a debug log line with credentials masked.
pub fn format_headers_for_logging(headers: &HeaderMap) -> String {
    let mut pairs: Vec<String> = headers
        .iter()
        .map(|(k, v)| {
            let value = v.to_str().unwrap_or("<invalid>");
            let shown = if is_sensitive_header(k.as_str()) {
                mask_sensitive_value(value)
            } else {
                value.to_string()
            };
            format!("{}={}", k.as_str(), shown)
        })
        .collect();
    pairs.sort();
    format!("{{{}}}", pairs.join(", "))
}
