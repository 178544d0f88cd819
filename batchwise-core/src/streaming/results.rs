//! Batch result streams
//!
//! [`BatchResultStream`] owns the streamed response body of a results
//! download and decodes it lazily, one line at a time. The body lives inside
//! the generator, so it is released exactly once: when the body ends, when a
//! transport error is yielded, when cancellation is observed, or when the
//! consumer drops the stream.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::LlmError;
use crate::execution::http::transport::HttpTransportStreamBody;
use crate::execution::transformers::batch::BatchResultTransformer;
use crate::streaming::lines::{body_lines, is_blank_line};
use crate::types::BatchResult;
use crate::utils::cancel::CancelHandle;

type ResultItemStream = Pin<Box<dyn Stream<Item = Result<BatchResult, LlmError>> + Send>>;

/// Lazy, single-pass stream of decoded batch results.
///
/// Undecodable lines are skipped. A transport error is yielded once and ends
/// the stream.
pub struct BatchResultStream {
    inner: ResultItemStream,
    cancel: CancelHandle,
}

impl BatchResultStream {
    /// Decode `body` line by line with `decoder`, stopping when `cancel` fires.
    pub fn from_body(
        provider_id: impl Into<String>,
        body: HttpTransportStreamBody,
        decoder: Arc<dyn BatchResultTransformer>,
        cancel: CancelHandle,
    ) -> Self {
        let provider_id = provider_id.into();
        let token = cancel.clone();

        let inner = async_stream::stream! {
            let mut lines = body_lines(body);
            let mut yielded = 0usize;
            let mut skipped = 0usize;
            let mut dropped = 0usize;

            loop {
                let next = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    next = lines.next() => next,
                };
                let line = match next {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        yield Err(e);
                        break;
                    }
                    None => break,
                };
                if is_blank_line(&line) {
                    skipped += 1;
                    continue;
                }
                if token.is_cancelled() {
                    break;
                }
                match decoder.decode(&line) {
                    Some(result) => {
                        yielded += 1;
                        yield Ok(result);
                    }
                    None => dropped += 1,
                }
            }

            drop(lines);
            debug!(
                provider = %provider_id,
                yielded,
                skipped,
                dropped,
                cancelled = token.is_cancelled(),
                "result stream released"
            );
        };

        Self {
            inner: Box::pin(inner),
            cancel,
        }
    }

    /// A stream that yields nothing.
    pub fn empty(cancel: CancelHandle) -> Self {
        Self {
            inner: Box::pin(futures_util::stream::empty()),
            cancel,
        }
    }

    /// Handle that cancels this stream. Clones share the same token.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Stop the stream at the next line boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for BatchResultStream {
    type Item = Result<BatchResult, LlmError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for BatchResultStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchResultStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
