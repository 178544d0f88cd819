//! Core Data Type Definitions
//!
//! ## Module Organization
//!
//! - **`chat`** - Canonical single-inference shapes (`ChatRequest`, `ChatResponse`)
//! - **`common`** - Enums and usage shared across providers
//! - **`batch`** - Batch jobs, request items, results and errors
//! - **`http`** - HTTP configuration (`HttpConfig` and builder)
//!
//! Everything is re-exported here:
//!
//! ```rust,ignore
//! use batchwise_core::types::{BatchRequest, BatchResult, ChatRequest};
//! ```

pub mod batch;
pub mod chat;
pub mod common;
pub mod http;

pub use batch::*;
pub use chat::*;
pub use common::*;
pub use http::{HttpConfig, HttpConfigBuilder};
