//! Response transformation traits
//!
//! Converts provider responses into unified response types.

use crate::error::LlmError;
use crate::types::ChatResponse;

/// Transform provider-specific responses into unified responses
pub trait ResponseTransformer: Send + Sync {
    /// Provider identifier
    fn provider_id(&self) -> &str;

    /// Transform provider-specific chat response JSON to unified ChatResponse
    fn transform_chat_response(&self, raw: &serde_json::Value) -> Result<ChatResponse, LlmError>;
}
