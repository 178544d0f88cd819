//! Executors
//!
//! Executors drive a provider spec over an `HttpTransport`. They own header
//! building, error classification and response mapping so provider crates
//! only describe routes and wire shapes.

pub mod batch;

pub use batch::{BatchExecutor, BatchExecutorBuilder, HttpBatchExecutor};
