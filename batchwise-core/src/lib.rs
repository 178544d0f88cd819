//! batchwise-core
//!
//! Provider-agnostic types, transport and streaming primitives for batch jobs.
#![deny(unsafe_code)]

pub mod core;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod streaming;
pub mod types;
pub mod utils;

pub use error::LlmError;
