//! Transformers
//!
//! Provider crates implement these traits; the orchestrator only sees the traits.
//!
//! - `request` / `response`: single chat inference, reused inside batch items
//! - `batch`: batch submission encoding and result-line decoding

pub mod batch;
pub mod request;
pub mod response;
