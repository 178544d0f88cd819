//! Provider specification and execution context.

pub mod provider_spec;

pub use provider_spec::{BatchProviderSpec, BatchTransformers, ProviderContext};
