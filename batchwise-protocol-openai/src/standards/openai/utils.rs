//! OpenAI protocol utilities
//!
//! Wire-format conversion helpers for Chat Completions.

use super::types::{OpenAiFunction, OpenAiMessage, OpenAiToolCall, OpenAiUsage};
use crate::error::LlmError;
use crate::types::*;

/// Convert tools to OpenAI Chat Completions format.
pub fn convert_tools_to_openai_format(tools: &[Tool]) -> Result<Vec<serde_json::Value>, LlmError> {
    let mut openai_tools = Vec::with_capacity(tools.len());

    for tool in tools {
        match tool {
            Tool::Function { function } => {
                if !function.parameters.is_object() {
                    return Err(LlmError::InvalidParameter(format!(
                        "Tool '{}' parameters must be a JSON object schema",
                        function.name
                    )));
                }
                openai_tools.push(serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": function.name,
                        "description": function.description,
                        "parameters": function.parameters
                    }
                }));
            }
        }
    }

    Ok(openai_tools)
}

/// Convert tool choice to OpenAI wire format.
pub fn convert_tool_choice(choice: &ToolChoice) -> serde_json::Value {
    match choice {
        ToolChoice::Auto => serde_json::json!("auto"),
        ToolChoice::Required => serde_json::json!("required"),
        ToolChoice::None => serde_json::json!("none"),
        ToolChoice::Tool { name } => {
            serde_json::json!({ "type": "function", "function": { "name": name } })
        }
    }
}

/// Convert canonical messages into OpenAI wire format.
///
/// Each tool result becomes its own `tool` message.
pub fn convert_messages(messages: &[ChatMessage]) -> Result<Vec<OpenAiMessage>, LlmError> {
    let mut openai_messages = Vec::new();

    for message in messages {
        match message.role {
            MessageRole::System | MessageRole::User => {
                let role = if message.role == MessageRole::System {
                    "system"
                } else {
                    "user"
                };
                openai_messages.push(OpenAiMessage {
                    role: role.to_string(),
                    content: Some(convert_message_content(&message.content)),
                    tool_calls: None,
                    tool_call_id: None,
                });
            }
            MessageRole::Assistant => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();
                match &message.content {
                    MessageContent::Text(t) => text.push_str(t),
                    MessageContent::MultiModal(parts) => {
                        for part in parts {
                            match part {
                                ContentPart::Text { text: t } => text.push_str(t),
                                ContentPart::ToolCall {
                                    tool_call_id,
                                    tool_name,
                                    arguments,
                                } => tool_calls.push(OpenAiToolCall {
                                    id: tool_call_id.clone(),
                                    r#type: "function".to_string(),
                                    function: Some(OpenAiFunction {
                                        name: tool_name.clone(),
                                        arguments: serde_json::to_string(arguments)?,
                                    }),
                                }),
                                _ => {}
                            }
                        }
                    }
                }
                openai_messages.push(OpenAiMessage {
                    role: "assistant".to_string(),
                    content: Some(serde_json::Value::String(text)),
                    tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                    tool_call_id: None,
                });
            }
            MessageRole::Tool => match &message.content {
                MessageContent::MultiModal(parts) => {
                    for part in parts {
                        let ContentPart::ToolResult {
                            tool_call_id,
                            output,
                            ..
                        } = part
                        else {
                            continue;
                        };
                        let content = match output {
                            serde_json::Value::String(s) => s.clone(),
                            other => serde_json::to_string(other)?,
                        };
                        openai_messages.push(OpenAiMessage {
                            role: "tool".to_string(),
                            content: Some(serde_json::Value::String(content)),
                            tool_calls: None,
                            tool_call_id: Some(tool_call_id.clone()),
                        });
                    }
                }
                MessageContent::Text(_) => {
                    return Err(LlmError::InvalidInput(
                        "Tool message must carry a tool result part".to_string(),
                    ));
                }
            },
        }
    }

    Ok(openai_messages)
}

fn convert_message_content(content: &MessageContent) -> serde_json::Value {
    match content {
        MessageContent::Text(text) => serde_json::Value::String(text.clone()),
        MessageContent::MultiModal(parts) => {
            if let [ContentPart::Text { text }] = parts.as_slice() {
                return serde_json::Value::String(text.clone());
            }

            let content_parts = parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => {
                        Some(serde_json::json!({"type": "text", "text": text}))
                    }
                    ContentPart::Image { url, detail } => {
                        let mut image = serde_json::json!({
                            "type": "image_url",
                            "image_url": { "url": url }
                        });
                        if let Some(detail) = detail {
                            image["image_url"]["detail"] = serde_json::json!(detail);
                        }
                        Some(image)
                    }
                    _ => None,
                })
                .collect();
            serde_json::Value::Array(content_parts)
        }
    }
}

/// Parse OpenAI finish reason to unified FinishReason.
pub fn parse_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    match reason {
        Some("stop") => Some(FinishReason::Stop),
        Some("length") => Some(FinishReason::Length),
        Some("tool_calls") | Some("function_call") => Some(FinishReason::ToolCalls),
        Some("content_filter") => Some(FinishReason::ContentFilter),
        Some(other) => Some(FinishReason::Other(other.to_string())),
        None => None,
    }
}

pub fn create_usage_from_response(usage: Option<&OpenAiUsage>) -> Option<Usage> {
    usage.map(|u| {
        let mut out = Usage::new(u.prompt_tokens, u.completion_tokens);
        if let Some(total) = u.total_tokens {
            out.total_tokens = total;
        }
        out.cached_tokens = u
            .prompt_tokens_details
            .as_ref()
            .and_then(|d| d.cached_tokens);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assistant_tool_calls_are_lifted_out_of_content() {
        let msgs = convert_messages(&[ChatMessage::assistant("checking")
            .with_tool_call("call_1", "weather", json!({"city": "Lima"}))
            .build()])
        .unwrap();
        assert_eq!(msgs[0].content, Some(json!("checking")));
        let calls = msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(
            calls[0].function.as_ref().unwrap().arguments,
            r#"{"city":"Lima"}"#
        );
    }

    #[test]
    fn tool_results_become_tool_messages() {
        let msgs = convert_messages(&[
            ChatMessage::tool_result("call_1", "weather", json!("sunny")).build(),
        ])
        .unwrap();
        assert_eq!(msgs[0].role, "tool");
        assert_eq!(msgs[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msgs[0].content, Some(json!("sunny")));
    }

    #[test]
    fn images_become_image_url_parts() {
        let msgs = convert_messages(&[ChatMessage::user("what is this")
            .with_image_url("https://example.com/a.png")
            .build()])
        .unwrap();
        let parts = msgs[0].content.as_ref().unwrap().as_array().unwrap();
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "https://example.com/a.png");
    }

    #[test]
    fn tool_choice_and_finish_reason_mapping() {
        assert_eq!(convert_tool_choice(&ToolChoice::Required), json!("required"));
        assert_eq!(
            convert_tool_choice(&ToolChoice::Tool { name: "f".into() }),
            json!({"type": "function", "function": {"name": "f"}})
        );
        assert_eq!(
            parse_finish_reason(Some("function_call")),
            Some(FinishReason::ToolCalls)
        );
        assert_eq!(
            parse_finish_reason(Some("weird")),
            Some(FinishReason::Other("weird".into()))
        );
    }
}
