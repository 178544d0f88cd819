//! Request transformation traits
//!
//! Converts the unified `ChatRequest` into a provider-specific JSON body.

use crate::error::LlmError;
use crate::types::ChatRequest;

/// Transform unified requests into provider-specific payloads
pub trait RequestTransformer: Send + Sync {
    /// Provider identifier (e.g., "openai", "anthropic")
    fn provider_id(&self) -> &str;

    /// Transform a unified ChatRequest into a provider-specific JSON body
    fn transform_chat(&self, req: &ChatRequest) -> Result<serde_json::Value, LlmError>;
}
