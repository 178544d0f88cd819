//! OpenAI API Standard
//!
//! - `transformers`: Chat Completions request/response mapping
//! - `batch`: JSONL submission encoding and output-file line decoding
//! - `spec`: headers, routes, file upload and job mapping for the batch orchestrator

pub mod batch;
pub mod errors;
pub mod spec;
pub mod transformers;
pub mod types;
pub mod utils;

pub use batch::{OpenAiBatchRequestTransformer, OpenAiBatchResultTransformer};
pub use spec::OpenAiBatchSpec;
pub use transformers::{OpenAiRequestTransformer, OpenAiResponseTransformer};
