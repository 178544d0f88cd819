//! Anthropic Message Batches Provider Spec
//!
//! Routing and job mapping for `/v1/messages/batches`. Submissions are inline,
//! so none of the file-upload hooks are implemented.

use std::sync::Arc;

use reqwest::header::HeaderMap;

use crate::core::{BatchProviderSpec, BatchTransformers, ProviderContext};
use crate::defaults::providers::ANTHROPIC_VERSION;
use crate::error::LlmError;
use crate::execution::http::transport::HttpMethod;
use crate::types::{BatchItem, BatchRequestCounts, BatchStatus};
use crate::utils::url::{encode_segment, join_url};

use super::batch::{AnthropicBatchRequestTransformer, AnthropicBatchResultTransformer};
use super::types::AnthropicMessageBatch;
use super::utils::{build_headers, classify_anthropic_http_error};

/// Context extra overriding the `anthropic-version` header.
pub const ANTHROPIC_VERSION_EXTRA: &str = "anthropic.version";

/// Fields of a Message Batch object that map onto `BatchItem` directly.
const MAPPED_FIELDS: [&str; 5] = [
    "id",
    "processing_status",
    "request_counts",
    "created_at",
    "results_url",
];

/// Anthropic batch provider specification
#[derive(Clone, Copy, Default)]
pub struct AnthropicBatchSpec;

impl AnthropicBatchSpec {
    pub fn new() -> Self {
        Self
    }
}

impl BatchProviderSpec for AnthropicBatchSpec {
    fn id(&self) -> &'static str {
        "anthropic"
    }

    fn build_headers(&self, ctx: &ProviderContext) -> Result<HeaderMap, LlmError> {
        let api_key = ctx.require_api_key()?;
        let version = ctx
            .extra_str(ANTHROPIC_VERSION_EXTRA)
            .unwrap_or(ANTHROPIC_VERSION);
        build_headers(api_key, version, &ctx.http_extra_headers)
    }

    fn batches_url(&self, ctx: &ProviderContext) -> String {
        join_url(&ctx.base_url, "messages/batches")
    }

    fn batch_url(&self, batch_id: &str, ctx: &ProviderContext) -> String {
        join_url(
            &ctx.base_url,
            &format!("messages/batches/{}", encode_segment(batch_id)),
        )
    }

    fn delete_route(&self, batch_id: &str, ctx: &ProviderContext) -> (HttpMethod, String) {
        (HttpMethod::Delete, self.batch_url(batch_id, ctx))
    }

    fn transform_batch_item(
        &self,
        raw: &serde_json::Value,
        _ctx: &ProviderContext,
    ) -> Result<BatchItem, LlmError> {
        let batch: AnthropicMessageBatch = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("Invalid Anthropic message batch: {e}")))?;
        let id = batch
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LlmError::ParseError("Anthropic message batch has no id".to_string()))?;

        let status = batch
            .processing_status
            .as_deref()
            .map(BatchStatus::parse)
            .unwrap_or_else(|| BatchStatus::Other(String::new()));
        let mut item = BatchItem::new(id, status);
        item.results_url = batch.results_url.filter(|u| !u.is_empty());
        item.created_at = batch
            .created_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc));
        item.request_counts = batch.request_counts.map(|c| BatchRequestCounts {
            total: [c.succeeded, c.errored, c.canceled, c.expired]
                .into_iter()
                .fold(c.processing, u32::saturating_add),
            processing: c.processing,
            succeeded: c.succeeded,
            errored: c.errored,
            cancelled: c.canceled,
            expired: c.expired,
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

    fn classify_http_error(
        &self,
        status: u16,
        body_text: &str,
        _headers: &HeaderMap,
    ) -> Option<LlmError> {
        classify_anthropic_http_error(status, body_text)
    }

    fn choose_batch_transformers(&self, _ctx: &ProviderContext) -> BatchTransformers {
        BatchTransformers {
            request: Arc::new(AnthropicBatchRequestTransformer::new()),
            result: Arc::new(AnthropicBatchResultTransformer::new()),
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
            "anthropic",
            "https://api.anthropic.com/v1/",
            Some("sk-ant-test".into()),
            HashMap::new(),
        )
    }

    #[test]
    fn routes_batches_endpoints() {
        let spec = AnthropicBatchSpec::new();
        assert_eq!(
            spec.batches_url(&ctx()),
            "https://api.anthropic.com/v1/messages/batches"
        );
        let (method, url) = spec.delete_route("msgbatch_01", &ctx());
        assert_eq!(method, HttpMethod::Delete);
        assert_eq!(url, "https://api.anthropic.com/v1/messages/batches/msgbatch_01");
    }

    #[test]
    fn headers_use_context_version_override() {
        let spec = AnthropicBatchSpec::new();
        let headers = spec
            .build_headers(&ctx().with_extra(ANTHROPIC_VERSION_EXTRA, json!("2024-01-01")))
            .unwrap();
        assert_eq!(headers.get("anthropic-version").unwrap(), "2024-01-01");
        assert_eq!(headers.get("x-api-key").unwrap(), "sk-ant-test");
    }

    #[test]
    fn headers_require_api_key() {
        let ctx = ProviderContext::new("anthropic", "http://h/v1", None, HashMap::new());
        assert!(matches!(
            AnthropicBatchSpec::new().build_headers(&ctx),
            Err(LlmError::MissingApiKey(_))
        ));
    }

    #[test]
    fn maps_message_batch_object() {
        let raw = json!({
            "id": "msgbatch_01",
            "type": "message_batch",
            "processing_status": "ended",
            "request_counts": {"processing": 0, "succeeded": 2, "errored": 1, "canceled": 0, "expired": 0},
            "created_at": "2024-09-24T18:37:24.100435Z",
            "ended_at": "2024-09-24T18:40:00Z",
            "expires_at": "2024-09-25T18:37:24.100435Z",
            "cancel_initiated_at": null,
            "results_url": "https://api.anthropic.com/v1/messages/batches/msgbatch_01/results"
        });
        let item = AnthropicBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(item.id, "msgbatch_01");
        assert_eq!(item.status, BatchStatus::Completed);
        assert!(item.results_url.as_deref().unwrap().ends_with("/results"));
        assert_eq!(item.request_counts.as_ref().unwrap().total, 3);
        assert!(item.created_at.is_some());
        assert_eq!(item.metadata.get("type"), Some(&json!("message_batch")));
        assert!(item.metadata.contains_key("ended_at"));
        assert!(!item.metadata.contains_key("cancel_initiated_at"));
        assert!(!item.metadata.contains_key("id"));
    }

    #[test]
    fn count_total_saturates() {
        let raw = json!({
            "id": "b",
            "processing_status": "in_progress",
            "request_counts": {"processing": u32::MAX, "succeeded": 1, "errored": 1, "canceled": 0, "expired": 0}
        });
        let item = AnthropicBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(item.request_counts.unwrap().total, u32::MAX);
    }

    #[test]
    fn in_progress_batch_has_no_results_url() {
        let raw = json!({"id": "b", "processing_status": "in_progress", "results_url": null});
        let item = AnthropicBatchSpec::new()
            .transform_batch_item(&raw, &ctx())
            .unwrap();
        assert_eq!(item.status, BatchStatus::InProgress);
        assert!(item.results_url.is_none());
    }

    #[test]
    fn batch_without_id_is_a_parse_error() {
        assert!(matches!(
            AnthropicBatchSpec::new().transform_batch_item(&json!({"processing_status": "ended"}), &ctx()),
            Err(LlmError::ParseError(_))
        ));
    }

    #[test]
    fn deletion_requires_matching_id() {
        let spec = AnthropicBatchSpec::new();
        assert!(spec.deletion_confirmed("b1", &json!({"id": "b1", "type": "message_batch_deleted"})));
        assert!(!spec.deletion_confirmed("b1", &json!({"type": "message_batch_deleted"})));
    }
}
