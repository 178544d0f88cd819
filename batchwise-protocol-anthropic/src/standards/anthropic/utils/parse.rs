use super::*;

/// Text blocks are joined with `\n`; `tool_use` blocks become tool-call parts.
pub fn parse_response_content_and_tools(
    content_blocks: &[AnthropicContentBlock],
) -> MessageContent {
    let mut parts = Vec::new();
    let mut text_content = String::new();

    for content_block in content_blocks {
        match content_block.r#type.as_str() {
            "text" => {
                if let Some(text) = &content_block.text {
                    if !text_content.is_empty() {
                        text_content.push('\n');
                    }
                    text_content.push_str(text);
                }
            }
            "tool_use" => {
                // First, add accumulated text if any
                if !text_content.is_empty() {
                    parts.push(ContentPart::text(&text_content));
                    text_content.clear();
                }

                if let (Some(id), Some(name)) = (&content_block.id, &content_block.name) {
                    parts.push(ContentPart::tool_call(
                        id.clone(),
                        name.clone(),
                        content_block
                            .input
                            .clone()
                            .unwrap_or_else(|| serde_json::json!({})),
                    ));
                }
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        return MessageContent::Text(text_content);
    }
    if !text_content.is_empty() {
        parts.push(ContentPart::text(text_content));
    }
    MessageContent::MultiModal(parts)
}

pub fn create_usage_from_response(usage: Option<&AnthropicUsage>) -> Option<Usage> {
    usage.map(|u| {
        let mut out = Usage::new(u.input_tokens, u.output_tokens);
        out.cached_tokens = u.cache_read_input_tokens;
        out
    })
}
