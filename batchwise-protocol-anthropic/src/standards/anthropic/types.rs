//! Anthropic wire types

use serde::{Deserialize, Serialize};

/// One message in the `messages` array of a Messages request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: serde_json::Value,
}

/// Content block of a Messages response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicContentBlock {
    #[serde(rename = "type")]
    pub r#type: String,
    pub text: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub input: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    pub cache_read_input_tokens: Option<u32>,
}

/// Non-streaming Messages response (`type: "message"`).
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicChatResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessageBatchRequest {
    pub custom_id: String,
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicCreateMessageBatchRequest {
    pub requests: Vec<AnthropicMessageBatchRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicRequestCounts {
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub succeeded: u32,
    #[serde(default)]
    pub errored: u32,
    #[serde(default)]
    pub canceled: u32,
    #[serde(default)]
    pub expired: u32,
}

/// Message Batch object returned by create / retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicMessageBatch {
    pub id: Option<String>,
    pub processing_status: Option<String>,
    pub request_counts: Option<AnthropicRequestCounts>,
    pub created_at: Option<String>,
    pub results_url: Option<String>,
}

/// `{"type":"error","error":{"type":..,"message":..}}`
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorEnvelope {
    pub error: AnthropicErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorBody {
    #[serde(rename = "type", default)]
    pub r#type: String,
    #[serde(default)]
    pub message: String,
}
