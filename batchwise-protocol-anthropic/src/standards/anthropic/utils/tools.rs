use super::*;

/// Convert function tools into Anthropic's `{name, description, input_schema}` shape.
///
/// The parameter schema must be a JSON object.
pub fn convert_tools_to_anthropic_format(
    tools: &[Tool],
) -> Result<Vec<serde_json::Value>, LlmError> {
    let mut anthropic_tools = Vec::with_capacity(tools.len());

    for tool in tools {
        match tool {
            Tool::Function { function } => {
                if function.name.trim().is_empty() {
                    return Err(LlmError::InvalidParameter(
                        "Tool name must not be empty".to_string(),
                    ));
                }
                if !function.parameters.is_object() {
                    return Err(LlmError::InvalidParameter(format!(
                        "Tool '{}' parameters must be a JSON object schema",
                        function.name
                    )));
                }

                let mut tool_map = serde_json::Map::new();
                tool_map.insert("name".to_string(), serde_json::json!(function.name));
                if !function.description.is_empty() {
                    tool_map.insert(
                        "description".to_string(),
                        serde_json::json!(function.description),
                    );
                }
                tool_map.insert("input_schema".to_string(), function.parameters.clone());
                anthropic_tools.push(serde_json::Value::Object(tool_map));
            }
        }
    }

    Ok(anthropic_tools)
}

#[cfg(test)]
mod tools_tests {
    use super::*;

    #[test]
    fn function_tool_uses_input_schema() {
        let tools = vec![Tool::function(
            "get_weather",
            "Get weather",
            serde_json::json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        )];
        let out = convert_tools_to_anthropic_format(&tools).unwrap();
        assert_eq!(out[0]["name"], "get_weather");
        assert_eq!(out[0]["input_schema"]["type"], "object");
        assert!(out[0].get("parameters").is_none());
    }

    #[test]
    fn non_object_schema_is_rejected() {
        let tools = vec![Tool::function("t", "", serde_json::json!("string"))];
        assert!(matches!(
            convert_tools_to_anthropic_format(&tools),
            Err(LlmError::InvalidParameter(_))
        ));
    }
}
