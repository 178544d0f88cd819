//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - HTTP client configuration
//! - Header management and log masking
//! - Per-request context
//! - The injectable transport and its reqwest implementation

pub mod client;
pub mod context;
pub mod headers;
pub mod reqwest_transport;
pub mod transport;

pub use client::*;
pub use context::*;
pub use headers::*;
pub use reqwest_transport::ReqwestTransport;
pub use transport::*;
