//! Response transformer for OpenAI Chat Completions

use crate::error::LlmError;
use crate::execution::transformers::response::ResponseTransformer;
use crate::standards::openai::types::OpenAiChatResponse;
use crate::standards::openai::utils::{create_usage_from_response, parse_finish_reason};
use crate::types::{ChatResponse, ContentPart, MessageContent};

#[derive(Clone, Default)]
pub struct OpenAiResponseTransformer;

impl OpenAiResponseTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl ResponseTransformer for OpenAiResponseTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_chat_response(&self, raw: &serde_json::Value) -> Result<ChatResponse, LlmError> {
        let response: OpenAiChatResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("Invalid OpenAI chat response: {e}")))?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("OpenAI chat response has no choices".into()))?;

        let text = choice.message.content.unwrap_or_default();
        let tool_calls = choice.message.tool_calls.unwrap_or_default();
        let content = if tool_calls.is_empty() {
            MessageContent::Text(text)
        } else {
            let mut parts = Vec::with_capacity(tool_calls.len() + 1);
            if !text.is_empty() {
                parts.push(ContentPart::text(text));
            }
            for call in tool_calls {
                let Some(function) = call.function else {
                    continue;
                };
                // Arguments are a JSON string; keep it verbatim if it does not parse.
                let arguments = serde_json::from_str(&function.arguments)
                    .unwrap_or(serde_json::Value::String(function.arguments));
                parts.push(ContentPart::tool_call(call.id, function.name, arguments));
            }
            MessageContent::MultiModal(parts)
        };

        let mut out = ChatResponse::new(content);
        out.id = response.id;
        out.model = response.model;
        out.usage = create_usage_from_response(response.usage.as_ref());
        out.finish_reason = parse_finish_reason(choice.finish_reason.as_deref());
        Ok(out)
    }
}
