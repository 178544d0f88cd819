pub fn convert_tool_choice(choice: &crate::types::ToolChoice) -> Option<serde_json::Value> {
    use crate::types::ToolChoice;

    match choice {
        ToolChoice::Auto => Some(serde_json::json!({
            "type": "auto"
        })),
        ToolChoice::Required => Some(serde_json::json!({
            "type": "any"
        })),
        ToolChoice::None => None, // Anthropic has no 'none'; tools are dropped instead
        ToolChoice::Tool { name } => Some(serde_json::json!({
            "type": "tool",
            "name": name
        })),
    }
}
