//! Batch Provider Specification
//!
//! A `BatchProviderSpec` tells the orchestrator how one provider:
//! - builds HTTP headers (authentication + custom headers)
//! - routes create / retrieve / delete / upload calls
//! - maps job objects into `BatchItem`
//! - picks its batch request/result transformers
//!
//! The orchestrator stays provider-agnostic; everything vendor-specific lives
//! behind this trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use batchwise_core::core::{BatchProviderSpec, ProviderContext, BatchTransformers};
//!
//! struct MyBatchSpec;
//!
//! impl BatchProviderSpec for MyBatchSpec {
//!     fn id(&self) -> &'static str { "my-provider" }
//!     fn build_headers(&self, ctx: &ProviderContext) -> Result<HeaderMap, LlmError> { /* auth */ }
//!     fn batches_url(&self, ctx: &ProviderContext) -> String { /* create endpoint */ }
//!     // ...
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::execution::http::transport::{HttpMethod, MultipartFile};
use crate::execution::transformers::batch::{BatchRequestTransformer, BatchResultTransformer};
use crate::types::{BatchItem, BatchRequest};

/// Provider execution context (for header construction and routing)
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub provider_id: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub http_extra_headers: HashMap<String, String>,
    /// Extra hints for provider-specific toggles
    /// (e.g. `anthropic.version`, `openai.completion_window`)
    pub extras: HashMap<String, serde_json::Value>,
}

impl ProviderContext {
    pub fn new(
        provider_id: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        http_extra_headers: HashMap<String, String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            base_url: base_url.into(),
            api_key: api_key.map(SecretString::from),
            http_extra_headers,
            extras: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// String extra, if present.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(|v| v.as_str())
    }

    /// The API key, or `MissingApiKey` naming this provider.
    pub fn require_api_key(&self) -> Result<&str, LlmError> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .ok_or_else(|| {
                LlmError::MissingApiKey(format!("no API key configured for {}", self.provider_id))
            })
    }
}

/// Transformers bundle required by the batch orchestrator
#[derive(Clone)]
pub struct BatchTransformers {
    pub request: Arc<dyn BatchRequestTransformer>,
    pub result: Arc<dyn BatchResultTransformer>,
}

/// Provider Specification for batch jobs: headers, routing, job mapping and transformer selection
pub trait BatchProviderSpec: Send + Sync {
    /// Provider identifier (e.g., "openai", "anthropic")
    fn id(&self) -> &'static str;

    /// Build JSON headers (auth + custom).
    fn build_headers(&self, ctx: &ProviderContext) -> Result<HeaderMap, LlmError>;

    /// Create-job endpoint.
    fn batches_url(&self, ctx: &ProviderContext) -> String;

    /// Single-job endpoint used by retrieve.
    fn batch_url(&self, batch_id: &str, ctx: &ProviderContext) -> String;

    /// Method and URL of the provider's closest "delete" operation.
    fn delete_route(&self, batch_id: &str, ctx: &ProviderContext) -> (HttpMethod, String);

    /// Whether a delete response confirms removal of `batch_id`.
    ///
    /// Default: the response's `id` must equal `batch_id`.
    fn deletion_confirmed(&self, batch_id: &str, raw: &serde_json::Value) -> bool {
        raw.get("id").and_then(|v| v.as_str()) == Some(batch_id)
    }

    /// Map a provider job object (create/retrieve response) into a `BatchItem`.
    fn transform_batch_item(
        &self,
        raw: &serde_json::Value,
        ctx: &ProviderContext,
    ) -> Result<BatchItem, LlmError>;

    /// Upload endpoint for providers that take submissions as files.
    fn files_url(&self, _ctx: &ProviderContext) -> Option<String> {
        None
    }

    /// Form fields and file part for the upload call.
    fn upload_form(
        &self,
        _payload: Bytes,
        _ctx: &ProviderContext,
    ) -> Result<(Vec<(String, String)>, MultipartFile), LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not accept file submissions",
            self.id()
        )))
    }

    /// Extract the uploaded file id from the upload response.
    fn transform_upload_response(&self, _raw: &serde_json::Value) -> Result<String, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not accept file submissions",
            self.id()
        )))
    }

    /// Create-job body that references an uploaded file.
    fn create_body_for_file(
        &self,
        _file_id: &str,
        _req: &BatchRequest,
        _ctx: &ProviderContext,
    ) -> Result<serde_json::Value, LlmError> {
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not accept file submissions",
            self.id()
        )))
    }

    /// Map a non-success response to a provider-specific error.
    ///
    /// `None` falls back to generic status classification.
    fn classify_http_error(
        &self,
        _status: u16,
        _body_text: &str,
        _headers: &HeaderMap,
    ) -> Option<LlmError> {
        None
    }

    /// Choose batch request/result transformers.
    fn choose_batch_transformers(&self, ctx: &ProviderContext) -> BatchTransformers;
}
