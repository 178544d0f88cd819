//! Transformers for Anthropic Claude
//!
//! Request/response mapping for the Messages API. The batch adapters reuse
//! these so a batch item is encoded exactly like a standalone request.

use crate::error::LlmError;
use crate::execution::transformers::{request::RequestTransformer, response::ResponseTransformer};
use crate::types::{ChatRequest, ChatResponse, ToolChoice};

use super::types::AnthropicChatResponse;
use super::utils::{
    convert_messages, convert_tool_choice, convert_tools_to_anthropic_format,
    create_usage_from_response, parse_finish_reason, parse_response_content_and_tools,
};

/// Anthropic requires `max_tokens`; used when the request leaves it unset.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Request transformer for Anthropic
#[derive(Clone, Default)]
pub struct AnthropicRequestTransformer;

impl AnthropicRequestTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl RequestTransformer for AnthropicRequestTransformer {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    fn transform_chat(&self, req: &ChatRequest) -> Result<serde_json::Value, LlmError> {
        let params = &req.common_params;
        if params.model.trim().is_empty() {
            return Err(LlmError::InvalidParameter(
                "Model must be specified".to_string(),
            ));
        }

        let (messages, system) = convert_messages(&req.messages)?;
        if messages.is_empty() {
            return Err(LlmError::InvalidInput(
                "At least one non-system message is required".to_string(),
            ));
        }

        let mut body = serde_json::json!({
            "model": params.model,
            "messages": messages,
            "max_tokens": params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        if let Some(system) = system {
            body["system"] = system;
        }

        // Anthropic accepts temperature in [0, 1] and rejects temperature + top_p together.
        if let Some(temperature) = params.temperature {
            body["temperature"] = serde_json::json!(temperature.clamp(0.0, 1.0));
        } else if let Some(top_p) = params.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        if let Some(top_k) = params.top_k {
            body["top_k"] = serde_json::json!(top_k);
        }
        if let Some(stops) = &params.stop_sequences
            && !stops.is_empty()
        {
            body["stop_sequences"] = serde_json::json!(stops);
        }

        let tools_disabled = matches!(req.tool_choice, Some(ToolChoice::None));
        if let Some(tools) = &req.tools
            && !tools.is_empty()
            && !tools_disabled
        {
            body["tools"] = serde_json::Value::Array(convert_tools_to_anthropic_format(tools)?);
            if let Some(choice) = req.tool_choice.as_ref().and_then(convert_tool_choice) {
                body["tool_choice"] = choice;
            }
        }

        if req.stream {
            body["stream"] = serde_json::Value::Bool(true);
        }

        Ok(body)
    }
}

/// Response transformer for Anthropic
#[derive(Clone, Default)]
pub struct AnthropicResponseTransformer;

impl AnthropicResponseTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl ResponseTransformer for AnthropicResponseTransformer {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    fn transform_chat_response(&self, raw: &serde_json::Value) -> Result<ChatResponse, LlmError> {
        let response: AnthropicChatResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("Invalid Anthropic response: {e}")))?;

        let mut out = ChatResponse::new(parse_response_content_and_tools(&response.content));
        out.id = response.id;
        out.model = response.model;
        out.usage = create_usage_from_response(response.usage.as_ref());
        out.finish_reason = parse_finish_reason(response.stop_reason.as_deref());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, FinishReason, MessageContent, Tool};
    use serde_json::json;

    fn request() -> ChatRequest {
        ChatRequest::builder()
            .model("claude-3-5-haiku-latest")
            .message(ChatMessage::system("terse").build())
            .message(ChatMessage::user("hello").build())
            .build()
    }

    #[test]
    fn body_has_model_messages_system_and_default_max_tokens() {
        let body = AnthropicRequestTransformer::new()
            .transform_chat(&request())
            .unwrap();
        assert_eq!(body["model"], "claude-3-5-haiku-latest");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["system"], "terse");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn temperature_is_clamped_and_wins_over_top_p() {
        let req = ChatRequest::builder()
            .model("m")
            .message(ChatMessage::user("x").build())
            .temperature(1.7)
            .top_p(0.9)
            .build();
        let body = AnthropicRequestTransformer::new().transform_chat(&req).unwrap();
        assert_eq!(body["temperature"], 1.0);
        assert!(body.get("top_p").is_none());
    }

    #[test]
    fn missing_model_is_invalid_parameter() {
        let req = ChatRequest::new(vec![ChatMessage::user("x").build()]);
        assert!(matches!(
            AnthropicRequestTransformer::new().transform_chat(&req),
            Err(LlmError::InvalidParameter(m)) if m.contains("Model must be specified")
        ));
    }

    #[test]
    fn tool_choice_none_drops_tools() {
        let req = request()
            .with_tools(vec![Tool::function("t", "d", json!({"type": "object"}))])
            .with_tool_choice(ToolChoice::None);
        let body = AnthropicRequestTransformer::new().transform_chat(&req).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());

        let req = request()
            .with_tools(vec![Tool::function("t", "d", json!({"type": "object"}))])
            .with_tool_choice(ToolChoice::Required);
        let body = AnthropicRequestTransformer::new().transform_chat(&req).unwrap();
        assert_eq!(body["tools"][0]["name"], "t");
        assert_eq!(body["tool_choice"]["type"], "any");
    }

    #[test]
    fn response_maps_text_usage_and_stop_reason() {
        let raw = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-haiku-latest",
            "content": [{"type": "text", "text": "Hi there"}],
            "stop_reason": "max_tokens",
            "usage": {"input_tokens": 7, "output_tokens": 3}
        });
        let resp = AnthropicResponseTransformer::new()
            .transform_chat_response(&raw)
            .unwrap();
        assert_eq!(resp.id.as_deref(), Some("msg_01"));
        assert_eq!(resp.content, MessageContent::Text("Hi there".into()));
        assert_eq!(resp.finish_reason, Some(FinishReason::Length));
        assert_eq!(resp.usage.unwrap().total_tokens, 10);
    }

    #[test]
    fn response_rejects_non_message_shapes() {
        assert!(matches!(
            AnthropicResponseTransformer::new().transform_chat_response(&json!({"content": "nope"})),
            Err(LlmError::ParseError(_))
        ));
    }
}
