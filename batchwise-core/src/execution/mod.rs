//! Execution layer
//!
//! - `http`: transport abstraction, reqwest implementation, headers, request context
//! - `errors`: HTTP status classification into `LlmError`
//! - `transformers`: request/response/batch transformer traits implemented by protocol crates
//! - `executors`: the batch job lifecycle driven over a transport

pub mod errors;
pub mod executors;
pub mod http;
pub mod transformers;
