use super::*;

/// Convert canonical messages into Anthropic `messages` plus the extracted `system` field.
///
/// Tool-role messages become user messages with `tool_result` blocks.
pub fn convert_messages(
    messages: &[ChatMessage],
) -> Result<(Vec<AnthropicMessage>, Option<serde_json::Value>), LlmError> {
    let mut anthropic_messages = Vec::new();
    let mut system_blocks: Vec<serde_json::Value> = Vec::new();

    for message in messages {
        match message.role {
            MessageRole::System => {
                let text = message.content.all_text();
                if !text.is_empty() {
                    system_blocks.push(serde_json::json!({"type": "text", "text": text}));
                }
            }
            MessageRole::User | MessageRole::Assistant => {
                let role = if message.role == MessageRole::User {
                    "user"
                } else {
                    "assistant"
                };
                anthropic_messages.push(AnthropicMessage {
                    role: role.to_string(),
                    content: convert_message_content(&message.content)?,
                });
            }
            MessageRole::Tool => {
                let content = match &message.content {
                    MessageContent::MultiModal(parts) => {
                        let blocks = parts
                            .iter()
                            .filter(|p| matches!(p, ContentPart::ToolResult { .. }))
                            .map(convert_content_part)
                            .collect::<Result<Vec<_>, _>>()?;
                        serde_json::Value::Array(blocks)
                    }
                    MessageContent::Text(_) => {
                        return Err(LlmError::InvalidInput(
                            "Tool message must carry a tool result part".to_string(),
                        ));
                    }
                };
                anthropic_messages.push(AnthropicMessage {
                    role: "user".to_string(),
                    content,
                });
            }
        }
    }

    let system = match system_blocks.len() {
        0 => None,
        1 => system_blocks
            .pop()
            .and_then(|b| b.get("text").cloned()),
        _ => Some(serde_json::Value::Array(system_blocks)),
    };

    Ok((anthropic_messages, system))
}

fn convert_message_content(content: &MessageContent) -> Result<serde_json::Value, LlmError> {
    match content {
        MessageContent::Text(text) => Ok(serde_json::Value::String(text.clone())),
        MessageContent::MultiModal(parts) => Ok(serde_json::Value::Array(
            parts
                .iter()
                .map(convert_content_part)
                .collect::<Result<Vec<_>, _>>()?,
        )),
    }
}

fn convert_content_part(part: &ContentPart) -> Result<serde_json::Value, LlmError> {
    Ok(match part {
        ContentPart::Text { text } => serde_json::json!({"type": "text", "text": text}),
        ContentPart::Image { url, .. } => serde_json::json!({
            "type": "image",
            "source": image_source(url)?
        }),
        ContentPart::ToolCall {
            tool_call_id,
            tool_name,
            arguments,
        } => serde_json::json!({
            "type": "tool_use",
            "id": tool_call_id,
            "name": tool_name,
            "input": arguments
        }),
        ContentPart::ToolResult {
            tool_call_id,
            output,
            is_error,
            ..
        } => {
            let content = match output {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let mut block = serde_json::json!({
                "type": "tool_result",
                "tool_use_id": tool_call_id,
                "content": content
            });
            if *is_error {
                block["is_error"] = serde_json::Value::Bool(true);
            }
            block
        }
    })
}

/// `data:<media>;base64,<data>` becomes a base64 source; anything else is a URL source.
fn image_source(url: &str) -> Result<serde_json::Value, LlmError> {
    let Some(rest) = url.strip_prefix("data:") else {
        return Ok(serde_json::json!({"type": "url", "url": url}));
    };
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| LlmError::InvalidInput("Malformed data URL for image".to_string()))?;
    let media_type = meta.strip_suffix(";base64").ok_or_else(|| {
        LlmError::InvalidInput("Only base64 data URLs are supported for images".to_string())
    })?;
    Ok(serde_json::json!({
        "type": "base64",
        "media_type": media_type,
        "data": data
    }))
}

#[cfg(test)]
mod messages_tests {
    use super::*;

    #[test]
    fn system_is_extracted_and_not_sent_as_message() {
        let (msgs, system) = convert_messages(&[
            ChatMessage::system("be brief").build(),
            ChatMessage::user("hi").build(),
        ])
        .unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, "user");
        assert_eq!(msgs[0].content, serde_json::json!("hi"));
        assert_eq!(system, Some(serde_json::json!("be brief")));
    }

    #[test]
    fn tool_results_are_sent_as_user_blocks() {
        let (msgs, _) = convert_messages(&[
            ChatMessage::assistant("")
                .with_tool_call("call_1", "weather", serde_json::json!({"city": "Paris"}))
                .build(),
            ChatMessage::tool_result("call_1", "weather", serde_json::json!({"temp": 21}))
                .build(),
        ])
        .unwrap();
        assert_eq!(msgs[0].content[0]["type"], "tool_use");
        assert_eq!(msgs[1].role, "user");
        assert_eq!(msgs[1].content[0]["type"], "tool_result");
        assert_eq!(msgs[1].content[0]["tool_use_id"], "call_1");
        assert_eq!(msgs[1].content[0]["content"], r#"{"temp":21}"#);
    }

    #[test]
    fn images_map_to_base64_or_url_sources() {
        let (msgs, _) = convert_messages(&[ChatMessage::user("look")
            .with_image_url("data:image/png;base64,AAAA")
            .with_image_url("https://example.com/cat.jpg")
            .build()])
        .unwrap();
        let blocks = msgs[0].content.as_array().unwrap();
        assert_eq!(blocks[1]["source"]["type"], "base64");
        assert_eq!(blocks[1]["source"]["media_type"], "image/png");
        assert_eq!(blocks[2]["source"]["type"], "url");
    }

    #[test]
    fn non_base64_data_url_is_rejected() {
        let err = convert_messages(&[ChatMessage::user("x")
            .with_image_url("data:image/png,raw")
            .build()])
        .unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));
    }
}
