//! Anthropic Messages API Standard
//!
//! - `transformers`: single-message request/response mapping
//! - `batch`: Message Batches submission encoding and result-line decoding
//! - `spec`: headers, routes and job mapping for the batch orchestrator

pub mod batch;
pub mod spec;
pub mod transformers;
pub mod types;
pub mod utils;

pub use batch::{AnthropicBatchRequestTransformer, AnthropicBatchResultTransformer};
pub use spec::AnthropicBatchSpec;
pub use transformers::{AnthropicRequestTransformer, AnthropicResponseTransformer};
