//! Common enums and usage types shared by chat and batch shapes.

use serde::{Deserialize, Serialize};

/// Reason why the model stopped generating tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Maps to OpenAI `stop`, Anthropic `end_turn`.
    Stop,
    /// Maps to OpenAI `length`, Anthropic `max_tokens`.
    Length,
    /// Maps to OpenAI `tool_calls`, Anthropic `tool_use`.
    ToolCalls,
    /// Maps to OpenAI `content_filter`, Anthropic `refusal`.
    ContentFilter,
    /// Anthropic `stop_sequence`.
    StopSequence,
    Error,
    Other(String),
    Unknown,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    /// Tokens served from a provider-side prompt cache, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u32>,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cached_tokens: None,
        }
    }
}
