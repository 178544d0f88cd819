//! Chat request/response types
//!
//! These are the canonical single-inference shapes. A batch item wraps one
//! `ChatRequest`; a successful batch result carries one `ChatResponse`.

use serde::{Deserialize, Serialize};

use super::common::{FinishReason, Usage};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single part of multi-modal message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Image referenced by URL (http(s) or `data:` URL).
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        output: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self::ToolCall {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: serde_json::Value,
    ) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            output,
            is_error: false,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Self::ToolCall { .. })
    }
}

/// Message content: plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    MultiModal(Vec<ContentPart>),
}

impl MessageContent {
    /// First text fragment, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::MultiModal(parts) => parts.iter().find_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    /// All text fragments joined with a single space.
    pub fn all_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::MultiModal(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::Assistant, content)
    }

    /// Tool result message answering a prior tool call.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: serde_json::Value,
    ) -> ChatMessageBuilder {
        ChatMessageBuilder {
            role: MessageRole::Tool,
            parts: vec![ContentPart::tool_result(tool_call_id, tool_name, output)],
        }
    }
}

/// Builder for `ChatMessage`
#[derive(Debug, Clone)]
pub struct ChatMessageBuilder {
    role: MessageRole,
    parts: Vec<ContentPart>,
}

impl ChatMessageBuilder {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        let text = content.into();
        let parts = if text.is_empty() {
            Vec::new()
        } else {
            vec![ContentPart::text(text)]
        };
        Self { role, parts }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Image {
            url: url.into(),
            detail: None,
        });
        self
    }

    pub fn with_tool_call(
        mut self,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        self.parts
            .push(ContentPart::tool_call(tool_call_id, tool_name, arguments));
        self
    }

    pub fn build(self) -> ChatMessage {
        let content = match self.parts.as_slice() {
            [] => MessageContent::Text(String::new()),
            [ContentPart::Text { text }] => MessageContent::Text(text.clone()),
            _ => MessageContent::MultiModal(self.parts),
        };
        ChatMessage {
            role: self.role,
            content,
        }
    }
}

/// Function tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the arguments; must be a JSON object.
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    Function { function: ToolFunction },
}

impl Tool {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self::Function {
            function: ToolFunction {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Tool choice strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    Auto,
    Required,
    None,
    Tool { name: String },
}

/// Sampling and model parameters shared by every provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonParams {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Chat request configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    pub common_params: CommonParams,
    /// Stream the response. Batch encoders always force this off.
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    pub const fn with_streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_common_params(mut self, params: CommonParams) -> Self {
        self.common_params = params;
        self
    }
}

/// Builder for `ChatRequest`
#[derive(Debug, Clone, Default)]
pub struct ChatRequestBuilder {
    request: ChatRequest,
}

impl ChatRequestBuilder {
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.request.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.request.messages.extend(messages);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.request.common_params.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.request.common_params.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.request.common_params.max_tokens = Some(max_tokens);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.request.common_params.top_p = Some(top_p);
        self
    }

    pub fn stop_sequences(mut self, stops: Vec<String>) -> Self {
        self.request.common_params.stop_sequences = Some(stops);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.request.tools = Some(tools);
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.request.tool_choice = Some(choice);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.request.stream = stream;
        self
    }

    pub fn build(self) -> ChatRequest {
        self.request
    }
}

/// Chat response from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: Option<String>,
    pub content: MessageContent,
    pub model: Option<String>,
    pub usage: Option<Usage>,
    pub finish_reason: Option<FinishReason>,
}

impl ChatResponse {
    pub fn new(content: MessageContent) -> Self {
        Self {
            id: None,
            content,
            model: None,
            usage: None,
            finish_reason: None,
        }
    }

    pub fn content_text(&self) -> Option<&str> {
        self.content.text()
    }

    pub fn tool_calls(&self) -> Vec<&ContentPart> {
        match &self.content {
            MessageContent::MultiModal(parts) => {
                parts.iter().filter(|p| p.is_tool_call()).collect()
            }
            MessageContent::Text(_) => vec![],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_text_message_collapses_to_text_content() {
        let msg = ChatMessage::user("hi").build();
        assert_eq!(msg.content, MessageContent::Text("hi".into()));

        let msg = ChatMessage::user("look")
            .with_image_url("https://example.com/cat.png")
            .build();
        assert!(matches!(msg.content, MessageContent::MultiModal(ref p) if p.len() == 2));
    }

    #[test]
    fn builder_sets_common_params() {
        let req = ChatRequest::builder()
            .model("gpt-4o-mini")
            .message(ChatMessage::user("hi").build())
            .max_tokens(16)
            .stream(true)
            .build();
        assert_eq!(req.common_params.model, "gpt-4o-mini");
        assert_eq!(req.common_params.max_tokens, Some(16));
        assert!(req.stream);
    }

    #[test]
    fn response_tool_calls_filters_parts() {
        let resp = ChatResponse::new(MessageContent::MultiModal(vec![
            ContentPart::text("Let me search..."),
            ContentPart::tool_call("call_123", "search", json!({})),
        ]));
        assert_eq!(resp.tool_calls().len(), 1);
        assert_eq!(resp.content_text(), Some("Let me search..."));
    }
}
