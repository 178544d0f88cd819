//! batchwise-protocol-anthropic
//!
//! Anthropic Messages protocol mapping and Message Batches adapters for batchwise.
#![deny(unsafe_code)]

pub use batchwise_core::{LlmError, core, defaults, error, execution, types, utils};

pub mod standards;
