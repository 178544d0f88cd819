//! HTTP transport abstraction.
//!
//! Every network call made by the batch orchestrator goes through
//! [`HttpTransport`]. The default implementation is
//! [`ReqwestTransport`](super::ReqwestTransport); tests and embedders can inject
//! their own to observe the final URL/headers/body and return synthetic
//! responses.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::header::HeaderMap;

use crate::error::LlmError;
use crate::execution::http::context::HttpRequestContext;

/// HTTP method used by a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level request with an optional JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl HttpTransportRequest {
    pub fn new(
        ctx: HttpRequestContext,
        method: HttpMethod,
        url: impl Into<String>,
        headers: HeaderMap,
    ) -> Self {
        Self {
            ctx,
            method,
            url: url.into(),
            headers,
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Transport-level multipart/form-data POST.
#[derive(Debug, Clone)]
pub struct HttpTransportMultipartRequest {
    pub ctx: HttpRequestContext,
    pub url: String,
    pub headers: HeaderMap,
    /// Plain text form fields, in order.
    pub fields: Vec<(String, String)>,
    pub file: MultipartFile,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, LlmError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            LlmError::ParseError(format!("Invalid JSON response body: {e}"))
        })
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>;

/// Owned, streamed response body.
///
/// Dropping it releases the underlying connection.
pub struct HttpTransportStreamBody {
    inner: ByteStream,
}

impl HttpTransportStreamBody {
    /// A body that yields the given bytes as a single chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(futures::stream::once(async move { Ok(bytes) }))
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, LlmError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Read at most `limit` bytes of the body into memory and drop the rest.
    /// Only meant for error bodies.
    pub async fn collect_text(mut self, limit: usize) -> Result<String, LlmError> {
        use futures::StreamExt;
        let mut bytes: Vec<u8> = Vec::new();
        while bytes.len() < limit {
            match self.next().await {
                Some(chunk) => {
                    let chunk = chunk?;
                    let take = chunk.len().min(limit - bytes.len());
                    bytes.extend_from_slice(&chunk[..take]);
                }
                None => break,
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Stream for HttpTransportStreamBody {
    type Item = Result<Bytes, LlmError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for HttpTransportStreamBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportStreamBody").finish_non_exhaustive()
    }
}

/// Transport-level response whose body is consumed incrementally.
#[derive(Debug)]
pub struct HttpTransportStreamResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: HttpTransportStreamBody,
}

impl HttpTransportStreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Custom HTTP transport.
///
/// Notes:
/// - Non-success statuses are returned as responses, not errors. Callers classify them.
/// - Only `execute_json` is required; the other methods default to
///   `UnsupportedOperation` so narrow test transports stay small.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET/DELETE without body, or POST with a JSON body. The response is fully buffered.
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError>;

    /// multipart/form-data upload.
    async fn execute_multipart(
        &self,
        request: HttpTransportMultipartRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "transport does not support multipart uploads ({})",
            request.url
        )))
    }

    /// Request whose response body is streamed.
    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "transport does not support streamed responses ({})",
            request.url
        )))
    }
}
