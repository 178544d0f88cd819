//! Utility helpers

pub mod cancel;
pub mod url;

pub use cancel::CancelHandle;
