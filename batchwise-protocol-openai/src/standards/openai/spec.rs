//! OpenAI Batch Provider Spec
//!
//! Jobs are created in two steps: the JSONL input is uploaded to `/files`
//! with `purpose=batch`, then `/batches` is called with the returned file id.
//! OpenAI has no batch deletion; the closest operation is cancel.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;

use crate::core::{BatchProviderSpec, BatchTransformers, ProviderContext};
use crate::defaults::providers::{
    OPENAI_BATCH_ENDPOINT, OPENAI_BATCH_FILE_NAME, OPENAI_COMPLETION_WINDOW,
};
use crate::error::LlmError;
use crate::execution::http::headers::HttpHeaderBuilder;
use crate::execution::http::transport::{HttpMethod, MultipartFile};
use crate::types::{BatchError, BatchItem, BatchRequest, BatchRequestCounts, BatchStatus};
use crate::utils::url::{encode_segment, join_url};

use super::batch::{OpenAiBatchRequestTransformer, OpenAiBatchResultTransformer};
use super::errors::classify_openai_http_error;
use super::types::{OpenAiBatch, OpenAiFileObject};

/// Context extra overriding the job completion window.
pub const COMPLETION_WINDOW_EXTRA: &str = "openai.completion_window";
/// Context extras forwarded as `OpenAI-Organization` / `OpenAI-Project`.
pub const ORGANIZATION_EXTRA: &str = "openai.organization";
pub const PROJECT_EXTRA: &str = "openai.project";

/// Fields of a Batch object that map onto `BatchItem` directly.
const MAPPED_FIELDS: [&str; 7] = [
    "id",
    "status",
    "created_at",
    "output_file_id",
    "error_file_id",
    "request_counts",
    "errors",
];

/// OpenAI batch provider specification
#[derive(Clone, Copy, Default)]
pub struct OpenAiBatchSpec;

impl OpenAiBatchSpec {
    pub fn new() -> Self {
        Self
    }

    fn file_content_url(file_id: &str, ctx: &ProviderContext) -> String {
        join_url(
            &ctx.base_url,
            &format!("files/{}/content", encode_segment(file_id)),
        )
    }
}

impl BatchProviderSpec for OpenAiBatchSpec {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn build_headers(&self, ctx: &ProviderContext) -> Result<HeaderMap, LlmError> {
        let mut builder = HttpHeaderBuilder::new()
            .with_bearer_auth(ctx.require_api_key()?)?
            .with_json_content_type();
        if let Some(org) = ctx.extra_str(ORGANIZATION_EXTRA) {
            builder = builder.with_header("OpenAI-Organization", org)?;
        }
        if let Some(project) = ctx.extra_str(PROJECT_EXTRA) {
            builder = builder.with_header("OpenAI-Project", project)?;
        }
        Ok(builder.with_custom_headers(&ctx.http_extra_headers)?.build())
    }

    fn batches_url(&self, ctx: &ProviderContext) -> String {
        join_url(&ctx.base_url, "batches")
    }

    fn batch_url(&self, batch_id: &str, ctx: &ProviderContext) -> String {
        join_url(
            &ctx.base_url,
            &format!("batches/{}", encode_segment(batch_id)),
        )
    }

    fn delete_route(&self, batch_id: &str, ctx: &ProviderContext) -> (HttpMethod, String) {
        (
            HttpMethod::Post,
            join_url(
                &ctx.base_url,
                &format!("batches/{}/cancel", encode_segment(batch_id)),
            ),
        )
    }

    fn transform_batch_item(
        &self,
        raw: &serde_json::Value,
        ctx: &ProviderContext,
    ) -> Result<BatchItem, LlmError> {
        let batch: OpenAiBatch = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("Invalid OpenAI batch object: {e}")))?;
        let id = batch
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LlmError::ParseError("OpenAI batch object has no id".to_string()))?;

        let status = batch
            .status
            .as_deref()
            .map(BatchStatus::parse)
            .unwrap_or_else(|| BatchStatus::Other(String::new()));
        let mut item = BatchItem::new(id, status);
        // Failed requests go to a separate file; it is the only result
        // location when no request succeeded.
        item.errors_url = batch
            .error_file_id
            .filter(|f| !f.is_empty())
            .map(|f| Self::file_content_url(&f, ctx));
        item.results_url = batch
            .output_file_id
            .filter(|f| !f.is_empty())
            .map(|f| Self::file_content_url(&f, ctx))
            .or_else(|| item.errors_url.clone());
        item.created_at = batch
            .created_at
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
        item.request_counts = batch.request_counts.map(|c| BatchRequestCounts {
            total: c.total,
            processing: c.total.saturating_sub(c.completed.saturating_add(c.failed)),
            succeeded: c.completed,
            errored: c.failed,
            cancelled: 0,
            expired: 0,
        });
        item.error = batch
            .errors
            .and_then(|e| e.data.into_iter().next())
            .map(|e| BatchError {
                code: e.code,
                message: match e.line {
                    Some(line) => format!("line {line}: {}", e.message.unwrap_or_default()),
                    None => e.message.unwrap_or_default(),
                },
                error_type: None,
            });

        if let Some(obj) = raw.as_object() {
            item.metadata = obj
                .iter()
                .filter(|(k, v)| !MAPPED_FIELDS.contains(&k.as_str()) && !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }
        Ok(item)
    }

    fn files_url(&self, ctx: &ProviderContext) -> Option<String> {
        Some(join_url(&ctx.base_url, "files"))
    }

    fn upload_form(
        &self,
        payload: Bytes,
        _ctx: &ProviderContext,
    ) -> Result<(Vec<(String, String)>, MultipartFile), LlmError> {
        let fields = vec![("purpose".to_string(), "batch".to_string())];
        let file = MultipartFile {
            field_name: "file".to_string(),
            file_name: OPENAI_BATCH_FILE_NAME.to_string(),
            content_type: "application/jsonl".to_string(),
            bytes: payload,
        };
        Ok((fields, file))
    }

    fn transform_upload_response(&self, raw: &serde_json::Value) -> Result<String, LlmError> {
        let file: OpenAiFileObject = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("Invalid OpenAI file object: {e}")))?;
        file.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LlmError::ParseError("OpenAI file upload returned no id".to_string()))
    }

    fn create_body_for_file(
        &self,
        file_id: &str,
        req: &BatchRequest,
        ctx: &ProviderContext,
    ) -> Result<serde_json::Value, LlmError> {
        let window = ctx
            .extra_str(COMPLETION_WINDOW_EXTRA)
            .unwrap_or(OPENAI_COMPLETION_WINDOW);
        let mut body = serde_json::json!({
            "input_file_id": file_id,
            "endpoint": OPENAI_BATCH_ENDPOINT,
            "completion_window": window,
        });
        if !req.metadata.is_empty() {
            body["metadata"] = serde_json::to_value(&req.metadata)?;
        }
        Ok(body)
    }

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        _headers: &HeaderMap,
    ) -> Option<LlmError> {
        classify_openai_http_error(self.id(), status, body_text)
    }

    fn choose_batch_transformers(&self, _ctx: &ProviderContext) -> BatchTransformers {
        BatchTransformers {
            request: Arc::new(OpenAiBatchRequestTransformer::new()),
            result: Arc::new(OpenAiBatchResultTransformer::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn ctx() -> ProviderContext {
        ProviderContext::new(
            "openai",
            "https://api.openai.com/v1",
            Some("sk-test".into()),
            HashMap::new(),
        )
    }

    #[test]
    fn routes_and_cancel_as_delete() {
        let spec = OpenAiBatchSpec::new();
        assert_eq!(spec.batches_url(&ctx()), "https://api.openai.com/v1/batches");
        assert_eq!(
            spec.batch_url("batch_1", &ctx()),
            "https://api.openai.com/v1/batches/batch_1"
        );
        assert_eq!(
            spec.delete_route("batch_1", &ctx()),
            (
                HttpMethod::Post,
                "https://api.openai.com/v1/batches/batch_1/cancel".to_string()
            )
        );
        assert_eq!(
            spec.files_url(&ctx()).as_deref(),
            Some("https://api.openai.com/v1/files")
        );
    }

    #[test]
    fn headers_carry_bearer_and_org() {
        let ctx = ctx().with_extra(ORGANIZATION_EXTRA, json!("org-1"));
        let headers = OpenAiBatchSpec::new().build_headers(&ctx).unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer sk-test");
        assert_eq!(headers.get("openai-organization").unwrap(), "org-1");
    }

    #[test]
    fn create_body_references_uploaded_file() {
        let req = BatchRequest::new().with_metadata("job", "nightly");
        let body = OpenAiBatchSpec::new()
            .create_body_for_file("file-abc", &req, &ctx())
            .unwrap();
        assert_eq!(body["input_file_id"], "file-abc");
        assert_eq!(body["endpoint"], "/v1/chat/completions");
        assert_eq!(body["completion_window"], "24h");
        assert_eq!(body["metadata"]["job"], "nightly");

        let body = OpenAiBatchSpec::new()
            .create_body_for_file(
                "f",
                &BatchRequest::new(),
                &ctx().with_extra(COMPLETION_WINDOW_EXTRA, json!("48h")),
            )
            .unwrap();
        assert_eq!(body["completion_window"], "48h");
        assert!(body.get("metadata").is_none());
    }

    #[test]
    fn upload_form_uses_batch_purpose() {
        let (fields, file) = OpenAiBatchSpec::new()
            .upload_form(Bytes::from_static(b"{}\n"), &ctx())
            .unwrap();
        assert_eq!(fields, vec![("purpose".to_string(), "batch".to_string())]);
        assert_eq!(file.field_name, "file");
        assert_eq!(file.content_type, "application/jsonl");
        assert_eq!(
            OpenAiBatchSpec::new()
                .transform_upload_response(&json!({"id": "file-1", "object": "file"}))
                .unwrap(),
            "file-1"
        );
        assert!(
            OpenAiBatchSpec::new()
                .transform_upload_response(&json!({"object": "file"}))
                .is_err()
        );
    }

    #[test]
    fn maps_completed_batch_object() {
        let raw = json!({
            "id": "batch_abc",
            "object": "batch",
            "endpoint": "/v1/chat/completions",
            "errors": null,
            "input_file_id": "file-in",
            "completion_window": "24h",
            "status": "completed",
            "output_file_id": "file-out",
            "error_file_id": "file-err",
            "created_at": 1711471533,
            "request_counts": {"total": 10, "completed": 8, "failed": 2},
            "metadata": {"job": "nightly"}
        });
        let item = OpenAiBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(item.id, "batch_abc");
        assert_eq!(item.status, BatchStatus::Completed);
        assert_eq!(
            item.results_url.as_deref(),
            Some("https://api.openai.com/v1/files/file-out/content")
        );
        assert_eq!(item.created_at.unwrap().timestamp(), 1711471533);
        let counts = item.request_counts.unwrap();
        assert_eq!((counts.succeeded, counts.errored, counts.processing), (8, 2, 0));
        assert_eq!(
            item.errors_url.as_deref(),
            Some("https://api.openai.com/v1/files/file-err/content")
        );
        assert!(!item.metadata.contains_key("error_file_id"));
        assert_eq!(item.metadata["metadata"]["job"], "nightly");
        assert!(!item.metadata.contains_key("errors"));
    }

    #[test]
    fn all_failed_job_streams_from_error_file() {
        let raw = json!({
            "id": "batch_x",
            "status": "completed",
            "output_file_id": null,
            "error_file_id": "file-err",
            "request_counts": {"total": 3, "completed": 0, "failed": 3}
        });
        let item = OpenAiBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(
            item.results_url.as_deref(),
            Some("https://api.openai.com/v1/files/file-err/content")
        );
        assert_eq!(item.errors_url, item.results_url);
        assert_eq!(item.request_counts.unwrap().errored, 3);
    }

    #[test]
    fn oversized_counts_do_not_overflow() {
        let raw = json!({
            "id": "b",
            "status": "in_progress",
            "request_counts": {"total": 5, "completed": u32::MAX, "failed": u32::MAX}
        });
        let counts = OpenAiBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap()
            .request_counts
            .unwrap();
        assert_eq!(counts.processing, 0);
    }

    #[test]
    fn failed_validation_surfaces_first_error() {
        let raw = json!({
            "id": "batch_bad",
            "status": "failed",
            "errors": {"object": "list", "data": [
                {"code": "invalid_json_line", "message": "not JSON", "param": null, "line": 3}
            ]}
        });
        let item = OpenAiBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(item.status, BatchStatus::Failed);
        assert!(item.results_url.is_none());
        let err = item.error.unwrap();
        assert_eq!(err.code.as_deref(), Some("invalid_json_line"));
        assert_eq!(err.message, "line 3: not JSON");
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let item = OpenAiBatchSpec::new()
            .transform_batch_item(&json!({"id": "b", "status": "paused"}), &ctx())
            .unwrap();
        assert_eq!(item.status, BatchStatus::Other("paused".into()));
    }
}
