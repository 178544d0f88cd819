//! Request transformer for OpenAI Chat Completions

use crate::error::LlmError;
use crate::execution::transformers::request::RequestTransformer;
use crate::standards::openai::utils::{
    convert_messages, convert_tool_choice, convert_tools_to_openai_format,
};
use crate::types::ChatRequest;

/// OpenAI caps the number of tools per request.
const MAX_TOOLS: usize = 128;

#[derive(Clone, Default)]
pub struct OpenAiRequestTransformer;

impl OpenAiRequestTransformer {
    pub fn new() -> Self {
        Self
    }

    fn validate(req: &ChatRequest) -> Result<(), LlmError> {
        let params = &req.common_params;
        if params.model.trim().is_empty() {
            return Err(LlmError::InvalidParameter(
                "Model must be specified".to_string(),
            ));
        }
        if let Some(t) = params.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(LlmError::InvalidParameter(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if let Some(p) = params.top_p
            && !(0.0..=1.0).contains(&p)
        {
            return Err(LlmError::InvalidParameter(
                "top_p must be between 0.0 and 1.0".to_string(),
            ));
        }
        if req.tools.as_ref().is_some_and(|t| t.len() > MAX_TOOLS) {
            return Err(LlmError::InvalidParameter(format!(
                "OpenAI supports maximum {MAX_TOOLS} tools per request"
            )));
        }
        Ok(())
    }
}

impl RequestTransformer for OpenAiRequestTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_chat(&self, req: &ChatRequest) -> Result<serde_json::Value, LlmError> {
        Self::validate(req)?;
        let params = &req.common_params;

        let mut body = serde_json::json!({ "model": params.model });
        body["messages"] = serde_json::to_value(convert_messages(&req.messages)?)?;

        if let Some(t) = params.temperature {
            body["temperature"] = serde_json::json!(t);
        }
        if let Some(tp) = params.top_p {
            body["top_p"] = serde_json::json!(tp);
        }
        if let Some(max) = params.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if let Some(seed) = params.seed {
            body["seed"] = serde_json::json!(seed);
        }
        if let Some(stops) = &params.stop_sequences
            && !stops.is_empty()
        {
            body["stop"] = serde_json::json!(stops);
        }

        if let Some(tools) = &req.tools
            && !tools.is_empty()
        {
            body["tools"] = serde_json::Value::Array(convert_tools_to_openai_format(tools)?);
            if let Some(choice) = &req.tool_choice {
                body["tool_choice"] = convert_tool_choice(choice);
            }
        }

        if req.stream {
            body["stream"] = serde_json::Value::Bool(true);
            body["stream_options"] = serde_json::json!({ "include_usage": true });
        }
        Ok(body)
    }
}
