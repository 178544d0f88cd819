//! OpenAI wire types

use serde::{Deserialize, Serialize};

/// OpenAI message format (chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// OpenAI tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiToolCall {
    pub id: String,
    pub r#type: String,
    pub function: Option<OpenAiFunction>,
}

/// OpenAI function call payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiFunction {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiPromptTokensDetails {
    pub cached_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: Option<u32>,
    pub prompt_tokens_details: Option<OpenAiPromptTokensDetails>,
}

/// Chat Completions response (`object: "chat.completion"`).
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChatResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    pub choices: Vec<OpenAiChoice>,
    pub usage: Option<OpenAiUsage>,
}

/// One line of a batch input file.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiBatchRequestLine<'a> {
    pub custom_id: &'a str,
    pub method: &'a str,
    pub url: &'a str,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiBatchRequestCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiBatchErrorData {
    pub code: Option<String>,
    pub message: Option<String>,
    /// 1-based input file line the error refers to.
    pub line: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiBatchErrors {
    #[serde(default)]
    pub data: Vec<OpenAiBatchErrorData>,
}

/// Batch object returned by create / retrieve / cancel.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiBatch {
    pub id: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<i64>,
    pub output_file_id: Option<String>,
    pub error_file_id: Option<String>,
    pub request_counts: Option<OpenAiBatchRequestCounts>,
    pub errors: Option<OpenAiBatchErrors>,
}

/// File object returned by `POST /files`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiFileObject {
    pub id: Option<String>,
}
