//! Batch executor
//!
//! Flow for every call: build headers via the spec, send through the
//! transport, classify non-success statuses (spec first, generic second),
//! then map the JSON body back through the spec.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use tracing::{debug, info};

use crate::core::{BatchProviderSpec, BatchTransformers, ProviderContext};
use crate::defaults::http as http_defaults;
use crate::error::LlmError;
use crate::execution::errors::classify_http_error;
use crate::execution::http::context::HttpRequestContext;
use crate::execution::http::transport::{
    HttpMethod, HttpTransport, HttpTransportMultipartRequest, HttpTransportRequest,
    HttpTransportResponse,
};
use crate::execution::transformers::batch::SubmissionPayload;
use crate::streaming::BatchResultStream;
use crate::types::{BatchItem, BatchRequest};
use crate::utils::cancel::CancelHandle;

#[async_trait::async_trait]
pub trait BatchExecutor: Send + Sync {
    /// Submit a batch and return the provider's view of the new job.
    async fn create(&self, req: &BatchRequest) -> Result<BatchItem, LlmError>;

    /// Fetch the current state of a job.
    async fn retrieve(&self, batch_id: &str) -> Result<BatchItem, LlmError>;

    /// Open the job's results as a lazy stream.
    ///
    /// Jobs without a results location yield an empty stream.
    async fn stream_results(
        &self,
        item: &BatchItem,
        cancel: CancelHandle,
    ) -> Result<BatchResultStream, LlmError>;

    /// Delete (or cancel) a job. `Ok(false)` when the provider answered but
    /// did not confirm the id.
    async fn delete(&self, batch_id: &str) -> Result<bool, LlmError>;
}

/// Generic HTTP-based batch executor
pub struct HttpBatchExecutor {
    pub provider_id: String,
    pub transport: Arc<dyn HttpTransport>,
    pub transformers: BatchTransformers,
    pub provider_spec: Arc<dyn BatchProviderSpec>,
    pub provider_context: ProviderContext,
}

/// Builder for creating HttpBatchExecutor instances
pub struct BatchExecutorBuilder {
    provider_id: String,
    transport: Arc<dyn HttpTransport>,
    spec: Option<Arc<dyn BatchProviderSpec>>,
    context: Option<ProviderContext>,
    transformers: Option<BatchTransformers>,
}

impl BatchExecutorBuilder {
    pub fn new(provider_id: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            provider_id: provider_id.into(),
            transport,
            spec: None,
            context: None,
            transformers: None,
        }
    }

    pub fn with_spec(mut self, spec: Arc<dyn BatchProviderSpec>) -> Self {
        self.spec = Some(spec);
        self
    }

    pub fn with_context(mut self, context: ProviderContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Override the transformers the spec would choose.
    pub fn with_transformers(mut self, transformers: BatchTransformers) -> Self {
        self.transformers = Some(transformers);
        self
    }

    pub fn build(self) -> Result<Arc<HttpBatchExecutor>, LlmError> {
        let spec = self.spec.ok_or_else(|| {
            LlmError::ConfigurationError("batch executor requires a provider spec".to_string())
        })?;
        let context = self.context.ok_or_else(|| {
            LlmError::ConfigurationError("batch executor requires a provider context".to_string())
        })?;
        let transformers = match self.transformers {
            Some(t) => t,
            None => spec.choose_batch_transformers(&context),
        };
        Ok(Arc::new(HttpBatchExecutor {
            provider_id: self.provider_id,
            transport: self.transport,
            transformers,
            provider_spec: spec,
            provider_context: context,
        }))
    }
}

impl HttpBatchExecutor {
    fn classify(&self, url: &str, status: u16, body_text: &str, headers: &HeaderMap) -> LlmError {
        if let Some(err) = self
            .provider_spec
            .classify_http_error(status, body_text, headers)
        {
            return err;
        }
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason());
        classify_http_error(&self.provider_id, url, status, body_text, headers, reason)
    }

    fn ensure_success(
        &self,
        url: &str,
        response: HttpTransportResponse,
    ) -> Result<HttpTransportResponse, LlmError> {
        if response.is_success() {
            return Ok(response);
        }
        Err(self.classify(url, response.status, &response.body_text(), &response.headers))
    }

    async fn send_json(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<HttpTransportResponse, LlmError> {
        let headers = self.provider_spec.build_headers(&self.provider_context)?;
        let ctx = HttpRequestContext::new(&self.provider_id, &url, false);
        let mut request = HttpTransportRequest::new(ctx, method, &url, headers);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        debug!(provider = %self.provider_id, %method, url = %url, "sending batch request");
        let response = self.transport.execute_json(request).await?;
        self.ensure_success(&url, response)
    }

    /// Upload a JSONL input file and return the provider's file id.
    async fn upload_input_file(&self, payload: bytes::Bytes) -> Result<String, LlmError> {
        let url = self
            .provider_spec
            .files_url(&self.provider_context)
            .ok_or_else(|| {
                LlmError::UnsupportedOperation(format!(
                    "{} has no file upload endpoint",
                    self.provider_id
                ))
            })?;
        let size = payload.len();
        let (fields, file) = self
            .provider_spec
            .upload_form(payload, &self.provider_context)?;
        let headers = self.provider_spec.build_headers(&self.provider_context)?;
        let request = HttpTransportMultipartRequest {
            ctx: HttpRequestContext::new(&self.provider_id, &url, false),
            url: url.clone(),
            headers,
            fields,
            file,
        };
        let response = self.transport.execute_multipart(request).await?;
        let response = self.ensure_success(&url, response)?;
        let file_id = self.provider_spec.transform_upload_response(&response.json()?)?;
        debug!(provider = %self.provider_id, file_id = %file_id, bytes = size, "uploaded batch input file");
        Ok(file_id)
    }
}

#[async_trait::async_trait]
impl BatchExecutor for HttpBatchExecutor {
    async fn create(&self, req: &BatchRequest) -> Result<BatchItem, LlmError> {
        let payload = self.transformers.request.transform_batch(req)?;
        let batches_url = self.provider_spec.batches_url(&self.provider_context);

        let body = match payload {
            SubmissionPayload::Inline(body) => body,
            SubmissionPayload::JsonLines(bytes) => {
                let file_id = self.upload_input_file(bytes).await?;
                self.provider_spec
                    .create_body_for_file(&file_id, req, &self.provider_context)?
            }
        };

        let response = self
            .send_json(HttpMethod::Post, batches_url, Some(body))
            .await?;
        let item = self
            .provider_spec
            .transform_batch_item(&response.json()?, &self.provider_context)?;
        info!(
            provider = %self.provider_id,
            batch_id = %item.id,
            items = req.len(),
            status = item.status.as_str(),
            "created batch"
        );
        Ok(item)
    }

    async fn retrieve(&self, batch_id: &str) -> Result<BatchItem, LlmError> {
        let url = self
            .provider_spec
            .batch_url(batch_id, &self.provider_context);
        let response = self.send_json(HttpMethod::Get, url, None).await?;
        let item = self
            .provider_spec
            .transform_batch_item(&response.json()?, &self.provider_context)?;
        debug!(
            provider = %self.provider_id,
            batch_id = %item.id,
            status = item.status.as_str(),
            "retrieved batch"
        );
        Ok(item)
    }

    async fn stream_results(
        &self,
        item: &BatchItem,
        cancel: CancelHandle,
    ) -> Result<BatchResultStream, LlmError> {
        let Some(url) = item.results_url.as_deref() else {
            debug!(provider = %self.provider_id, batch_id = %item.id, "batch has no results yet");
            return Ok(BatchResultStream::empty(cancel));
        };
        if cancel.is_cancelled() {
            return Ok(BatchResultStream::empty(cancel));
        }

        let headers = self.provider_spec.build_headers(&self.provider_context)?;
        let ctx = HttpRequestContext::new(&self.provider_id, url, true);
        let request = HttpTransportRequest::new(ctx, HttpMethod::Get, url, headers);
        let response = self.transport.execute_stream(request).await?;
        if !response.is_success() {
            let status = response.status;
            let headers = response.headers;
            let body_text = response
                .body
                .collect_text(http_defaults::MAX_ERROR_BODY_BYTES)
                .await
                .unwrap_or_default();
            return Err(self.classify(url, status, &body_text, &headers));
        }

        debug!(provider = %self.provider_id, batch_id = %item.id, "opened result stream");
        Ok(BatchResultStream::from_body(
            &self.provider_id,
            response.body,
            self.transformers.result.clone(),
            cancel,
        ))
    }

    async fn delete(&self, batch_id: &str) -> Result<bool, LlmError> {
        let (method, url) = self
            .provider_spec
            .delete_route(batch_id, &self.provider_context);
        let response = self.send_json(method, url, None).await?;
        // An empty or non-JSON success body confirms nothing.
        let raw: serde_json::Value =
            serde_json::from_slice(&response.body).unwrap_or(serde_json::Value::Null);
        let confirmed = self.provider_spec.deletion_confirmed(batch_id, &raw);
        info!(provider = %self.provider_id, batch_id, confirmed, "deleted batch");
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::transport::{HttpTransportStreamBody, HttpTransportStreamResponse};
    use crate::execution::transformers::batch::{
        BatchRequestTransformer, BatchResultTransformer, decode_canonical,
    };
    use crate::types::{BatchResult, BatchStatus, ChatMessage, ChatRequest};
    use futures_util::StreamExt;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct InlineEncoder;

    impl BatchRequestTransformer for InlineEncoder {
        fn provider_id(&self) -> &str {
            "test"
        }

        fn transform_batch(&self, req: &BatchRequest) -> Result<SubmissionPayload, LlmError> {
            let ids: Vec<&str> = req.requests.iter().map(|r| r.custom_id.as_str()).collect();
            Ok(SubmissionPayload::Inline(serde_json::json!({ "ids": ids })))
        }
    }

    struct CanonicalDecoder;

    impl BatchResultTransformer for CanonicalDecoder {
        fn provider_id(&self) -> &str {
            "test"
        }

        fn transform_result_line(&self, raw: &str) -> Result<BatchResult, LlmError> {
            decode_canonical(raw)
        }
    }

    struct TestSpec;

    impl BatchProviderSpec for TestSpec {
        fn id(&self) -> &'static str {
            "test"
        }

        fn build_headers(&self, _ctx: &ProviderContext) -> Result<HeaderMap, LlmError> {
            Ok(HeaderMap::new())
        }

        fn batches_url(&self, ctx: &ProviderContext) -> String {
            format!("{}/batches", ctx.base_url)
        }

        fn batch_url(&self, batch_id: &str, ctx: &ProviderContext) -> String {
            format!("{}/batches/{batch_id}", ctx.base_url)
        }

        fn delete_route(&self, batch_id: &str, ctx: &ProviderContext) -> (HttpMethod, String) {
            (HttpMethod::Delete, self.batch_url(batch_id, ctx))
        }

        fn transform_batch_item(
            &self,
            raw: &serde_json::Value,
            _ctx: &ProviderContext,
        ) -> Result<BatchItem, LlmError> {
            let id = raw["id"].as_str().unwrap_or_default();
            let mut item = BatchItem::new(id, BatchStatus::parse(raw["status"].as_str().unwrap_or("")));
            item.results_url = raw["results_url"].as_str().map(str::to_string);
            Ok(item)
        }

        fn classify_http_error(
            &self,
            status: u16,
            body_text: &str,
            _headers: &HeaderMap,
        ) -> Option<LlmError> {
            (status == 400).then(|| LlmError::InvalidInput(body_text.to_string()))
        }

        fn choose_batch_transformers(&self, _ctx: &ProviderContext) -> BatchTransformers {
            BatchTransformers {
                request: Arc::new(InlineEncoder),
                result: Arc::new(CanonicalDecoder),
            }
        }
    }

    /// Answers each call from a queue and records what was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<Vec<(u16, String)>>,
        calls: Mutex<Vec<(HttpMethod, String)>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.lock().unwrap().push((status, body.to_string()));
            self
        }

        fn next(&self) -> (u16, String) {
            self.replies.lock().unwrap().remove(0)
        }

        fn calls(&self) -> Vec<(HttpMethod, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute_json(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, LlmError> {
            self.calls.lock().unwrap().push((request.method, request.url));
            let (status, body) = self.next();
            Ok(HttpTransportResponse {
                status,
                headers: HeaderMap::new(),
                body: body.into_bytes(),
            })
        }

        async fn execute_stream(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportStreamResponse, LlmError> {
            self.calls.lock().unwrap().push((request.method, request.url));
            let (status, body) = self.next();
            Ok(HttpTransportStreamResponse {
                status,
                headers: HeaderMap::new(),
                body: HttpTransportStreamBody::from_bytes(body),
            })
        }
    }

    fn executor(transport: Arc<ScriptedTransport>) -> Arc<HttpBatchExecutor> {
        BatchExecutorBuilder::new("test", transport)
            .with_spec(Arc::new(TestSpec))
            .with_context(ProviderContext::new("test", "http://h/v1", None, HashMap::new()))
            .build()
            .unwrap()
    }

    fn request() -> BatchRequest {
        let chat = ChatRequest::builder()
            .model("m")
            .message(ChatMessage::user("hi").build())
            .build();
        BatchRequest::new().with_item("a", chat.clone()).with_item("b", chat)
    }

    #[test]
    fn builder_requires_spec_and_context() {
        let transport: Arc<dyn HttpTransport> = Arc::new(ScriptedTransport::default());
        assert!(matches!(
            BatchExecutorBuilder::new("test", transport).build(),
            Err(LlmError::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn create_posts_inline_payload_and_maps_item() {
        let transport =
            Arc::new(ScriptedTransport::default().reply(200, r#"{"id":"b1","status":"in_progress"}"#));
        let item = executor(transport.clone()).create(&request()).await.unwrap();
        assert_eq!(item.id, "b1");
        assert_eq!(item.status, BatchStatus::InProgress);
        assert_eq!(
            transport.calls(),
            vec![(HttpMethod::Post, "http://h/v1/batches".to_string())]
        );
    }

    #[tokio::test]
    async fn spec_classification_wins_over_generic() {
        let transport = Arc::new(ScriptedTransport::default().reply(400, "bad batch"));
        match executor(transport).create(&request()).await {
            Err(LlmError::InvalidInput(msg)) => assert_eq!(msg, "bad batch"),
            other => panic!("unexpected: {other:?}"),
        }

        let transport = Arc::new(ScriptedTransport::default().reply(404, "gone"));
        assert!(matches!(
            executor(transport).retrieve("b1").await,
            Err(LlmError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn file_submission_is_unsupported_without_upload_endpoint() {
        struct LinesEncoder;
        impl BatchRequestTransformer for LinesEncoder {
            fn provider_id(&self) -> &str {
                "test"
            }
            fn transform_batch(&self, _req: &BatchRequest) -> Result<SubmissionPayload, LlmError> {
                Ok(SubmissionPayload::JsonLines(bytes::Bytes::from_static(b"{}\n")))
            }
        }

        let transport = Arc::new(ScriptedTransport::default());
        let exec = BatchExecutorBuilder::new("test", transport.clone())
            .with_spec(Arc::new(TestSpec))
            .with_context(ProviderContext::new("test", "http://h/v1", None, HashMap::new()))
            .with_transformers(BatchTransformers {
                request: Arc::new(LinesEncoder),
                result: Arc::new(CanonicalDecoder),
            })
            .build()
            .unwrap();
        assert!(matches!(
            exec.create(&request()).await,
            Err(LlmError::UnsupportedOperation(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn stream_results_without_url_makes_no_call() {
        let transport = Arc::new(ScriptedTransport::default());
        let item = BatchItem::new("b1", BatchStatus::InProgress);
        let stream = executor(transport.clone())
            .stream_results(&item, CancelHandle::new())
            .await
            .unwrap();
        assert_eq!(stream.count().await, 0);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn stream_results_decodes_lines_and_classifies_failures() {
        let body = concat!(
            r#"{"custom_id":"a","result":{"type":"succeeded"}}"#,
            "\nnot json\n",
            r#"{"custom_id":"b","result":{"type":"expired"}}"#,
            "\n"
        );
        let transport = Arc::new(ScriptedTransport::default().reply(200, body).reply(401, "no"));
        let exec = executor(transport.clone());
        let item = BatchItem::new("b1", BatchStatus::Completed).with_results_url("http://h/r");

        let ids: Vec<String> = exec
            .stream_results(&item, CancelHandle::new())
            .await
            .unwrap()
            .map(|r| r.unwrap().custom_id)
            .collect()
            .await;
        assert_eq!(ids, vec!["a", "b"]);

        assert!(matches!(
            exec.stream_results(&item, CancelHandle::new()).await,
            Err(LlmError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn delete_confirms_only_matching_id() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .reply(200, r#"{"id":"b1","type":"message_batch_deleted"}"#)
                .reply(200, r#"{"id":"other"}"#)
                .reply(204, ""),
        );
        let exec = executor(transport.clone());
        assert!(exec.delete("b1").await.unwrap());
        assert!(!exec.delete("b1").await.unwrap());
        assert!(!exec.delete("b1").await.unwrap());
        assert_eq!(transport.calls()[0].0, HttpMethod::Delete);
    }
}
