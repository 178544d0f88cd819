//! Batch client
//!
//! `BatchClient` is the entry point for the job lifecycle: submit a batch,
//! look it up, stream its results, and delete it. It is cheap to clone and
//! can drive any number of jobs concurrently.

use std::sync::Arc;

use crate::builder::BatchClientBuilder;
use crate::error::LlmError;
use crate::execution::executors::{BatchExecutor, HttpBatchExecutor};
use crate::provider::BatchProvider;
use crate::streaming::BatchResultStream;
use crate::types::{BatchItem, BatchRequest};
use crate::utils::CancelHandle;

/// Handle to one provider's batch API.
#[derive(Clone)]
pub struct BatchClient {
    provider: BatchProvider,
    executor: Arc<HttpBatchExecutor>,
}

impl BatchClient {
    pub fn builder() -> BatchClientBuilder {
        BatchClientBuilder::new()
    }

    pub(crate) fn new(provider: BatchProvider, executor: Arc<HttpBatchExecutor>) -> Self {
        Self { provider, executor }
    }

    pub fn provider(&self) -> BatchProvider {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.executor.provider_context.base_url
    }

    /// Submit a batch.
    ///
    /// Every item is encoded up front; a single invalid item fails the call
    /// before anything is sent. File-based providers upload the encoded
    /// input first and then create the job, so a failed create can leave an
    /// orphaned upload behind.
    pub async fn create(&self, request: &BatchRequest) -> Result<BatchItem, LlmError> {
        self.executor.create(request).await
    }

    /// Fetch the current state of a job, including its results location
    /// once the provider has one.
    pub async fn retrieve(&self, batch_id: &str) -> Result<BatchItem, LlmError> {
        self.executor.retrieve(batch_id).await
    }

    /// Stream a job's results.
    ///
    /// The returned stream carries its own [`CancelHandle`], reachable via
    /// [`BatchResultStream::cancel_handle`].
    pub async fn stream_results(&self, item: &BatchItem) -> Result<BatchResultStream, LlmError> {
        self.stream_results_with_cancel(item, CancelHandle::new())
            .await
    }

    /// Stream a job's results, stopping when `cancel` fires.
    ///
    /// Cancellation is observed at line boundaries, both while waiting for
    /// the next line and before decoding it.
    pub async fn stream_results_with_cancel(
        &self,
        item: &BatchItem,
        cancel: CancelHandle,
    ) -> Result<BatchResultStream, LlmError> {
        self.executor.stream_results(item, cancel).await
    }

    /// Stream the failed items a provider keeps apart from the main
    /// results (OpenAI's error file).
    ///
    /// Empty when the job has no separate errors location, or when that
    /// location is already the job's `results_url`.
    pub async fn stream_errors(&self, item: &BatchItem) -> Result<BatchResultStream, LlmError> {
        match item.errors_url.as_deref() {
            Some(url) if item.results_url.as_deref() != Some(url) => {
                let errors = item.clone().with_results_url(url);
                self.stream_results(&errors).await
            }
            _ => Ok(BatchResultStream::empty(CancelHandle::new())),
        }
    }

    /// Delete a job (OpenAI: cancel it).
    ///
    /// `Ok(true)` only when the provider's answer carries the same id.
    pub async fn delete(&self, batch_id: &str) -> Result<bool, LlmError> {
        self.executor.delete(batch_id).await
    }
}

impl std::fmt::Debug for BatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchClient")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url())
            .finish()
    }
}
