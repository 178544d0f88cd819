//! Streaming Module
//!
//! Helpers for consuming newline-delimited response bodies, and the result
//! stream built on top of them.

mod lines;
mod results;

pub use lines::*;
pub use results::BatchResultStream;
