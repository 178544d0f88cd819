//! Default `HttpTransport` backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tracing::debug;

use crate::error::LlmError;
use crate::execution::http::headers::format_headers_for_logging;
use crate::execution::http::transport::{
    HttpMethod, HttpTransport, HttpTransportMultipartRequest, HttpTransportRequest,
    HttpTransportResponse, HttpTransportStreamBody, HttpTransportStreamResponse,
};

/// `HttpTransport` implementation on top of a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    /// Total deadline for buffered calls. Never applied to streamed calls.
    request_timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn builder(&self, request: &HttpTransportRequest) -> reqwest::RequestBuilder {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        let builder = builder.headers(request.headers.clone());
        match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }

    fn with_timeout(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn buffer(response: reqwest::Response) -> Result<HttpTransportResponse, LlmError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        debug!(
            request_id = %request.ctx.request_id,
            provider = %request.ctx.provider_id,
            method = %request.method,
            url = %request.url,
            headers = %format_headers_for_logging(&request.headers),
            "sending request"
        );
        let response = self.with_timeout(self.builder(&request)).send().await?;
        Self::buffer(response).await
    }

    async fn execute_multipart(
        &self,
        request: HttpTransportMultipartRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        debug!(
            request_id = %request.ctx.request_id,
            provider = %request.ctx.provider_id,
            url = %request.url,
            file_name = %request.file.file_name,
            bytes = request.file.bytes.len(),
            "uploading file"
        );

        let part = reqwest::multipart::Part::bytes(request.file.bytes.to_vec())
            .file_name(request.file.file_name.clone())
            .mime_str(&request.file.content_type)
            .map_err(|e| LlmError::InvalidParameter(format!("Invalid content type: {e}")))?;
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &request.fields {
            form = form.text(name.clone(), value.clone());
        }
        let form = form.part(request.file.field_name.clone(), part);

        // reqwest sets the multipart boundary itself.
        let mut headers = request.headers.clone();
        headers.remove(reqwest::header::CONTENT_TYPE);
        let builder = self
            .client
            .post(&request.url)
            .headers(headers)
            .multipart(form);
        let response = self.with_timeout(builder).send().await?;
        Self::buffer(response).await
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportStreamResponse, LlmError> {
        debug!(
            request_id = %request.ctx.request_id,
            provider = %request.ctx.provider_id,
            method = %request.method,
            url = %request.url,
            "opening streamed response"
        );
        let response = self.builder(&request).send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body =
            HttpTransportStreamBody::from_stream(response.bytes_stream().map_err(LlmError::from));
        Ok(HttpTransportStreamResponse {
            status,
            headers,
            body,
        })
    }
}
