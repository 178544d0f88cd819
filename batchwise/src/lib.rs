//! # batchwise
//!
//! Bulk asynchronous batch jobs for LLM providers behind one data model.
//!
//! A batch is a list of chat requests, each tagged with a caller-chosen
//! `custom_id`. batchwise encodes it the way the provider wants it (inline
//! JSON for Anthropic Message Batches, an uploaded JSONL file for the OpenAI
//! Batch API), submits it, and later streams the results back as
//! [`BatchResult`](types::BatchResult)s joined by `custom_id`.
#![deny(unsafe_code)]

//! ## Quick Start
//!
//! ```rust,no_run
//! use batchwise::prelude::*;
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LlmError> {
//!     let client = BatchClient::builder().anthropic().build()?;
//!
//!     let chat = ChatRequest::builder()
//!         .model("claude-3-5-haiku-latest")
//!         .message(ChatMessage::user("Say hi").build())
//!         .build();
//!     let batch = BatchRequest::new()
//!         .with_item("greeting-1", chat.clone())
//!         .with_item("greeting-2", chat);
//!
//!     let job = client.create(&batch).await?;
//!     // ...later, once the provider reports a terminal status
//!     let job = client.retrieve(&job.id).await?;
//!     let mut results = client.stream_results(&job).await?;
//!     while let Some(result) = results.next().await {
//!         let result = result?;
//!         println!("{} -> {:?}", result.custom_id, result.status());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `openai` (default): OpenAI Batch API (JSONL upload + `/batches`)
//! - `anthropic` (default): Anthropic Message Batches

pub mod builder;
pub mod client;
pub mod provider;

pub use batchwise_core::{core, defaults, error, execution, streaming, types, utils};

pub use builder::BatchClientBuilder;
pub use client::BatchClient;
pub use error::LlmError;
pub use provider::BatchProvider;
pub use streaming::BatchResultStream;
pub use utils::CancelHandle;

/// Protocol mappings, for callers that want to encode or decode without a client.
pub mod standards {
    #[cfg(feature = "anthropic")]
    pub use batchwise_protocol_anthropic::standards::anthropic;
    #[cfg(feature = "openai")]
    pub use batchwise_protocol_openai::standards::openai;
}

/// Commonly used types
pub mod prelude {
    pub use crate::builder::BatchClientBuilder;
    pub use crate::client::BatchClient;
    pub use crate::error::LlmError;
    pub use crate::execution::http::{
        HttpTransport, HttpTransportMultipartRequest, HttpTransportRequest,
        HttpTransportResponse, HttpTransportStreamBody, HttpTransportStreamResponse,
    };
    pub use crate::provider::BatchProvider;
    pub use crate::streaming::BatchResultStream;
    pub use crate::types::{
        BatchError, BatchItem, BatchRequest, BatchRequestCounts, BatchRequestItem, BatchResult,
        BatchResultContent, BatchResultError, BatchStatus, ChatMessage, ChatRequest,
        ChatResponse, HttpConfig, ResultStatus,
    };
    pub use crate::utils::CancelHandle;
}
