//! Per-request context passed to transports.

/// Context describing one outgoing HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub provider_id: String,
    pub url: String,
    /// Whether the response body is consumed as a stream.
    pub stream: bool,
}

impl HttpRequestContext {
    pub fn new(provider_id: impl Into<String>, url: impl Into<String>, stream: bool) -> Self {
        Self {
            request_id: generate_request_id(),
            provider_id: provider_id.into(),
            url: url.into(),
            stream,
        }
    }
}

/// Generate a unique request id for log correlation.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
