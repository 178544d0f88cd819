//! batchwise-protocol-openai
//!
//! OpenAI Chat Completions mapping and Batch API adapters for batchwise.
#![deny(unsafe_code)]

pub use batchwise_core::{LlmError, core, defaults, error, execution, types, utils};

pub mod standards;
