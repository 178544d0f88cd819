//! Anthropic Message Batches adapters
//!
//! Submission is one inline document:
//! `{"requests": [{"custom_id": .., "params": <Messages request body>}]}`.
//! Each `params` body comes from [`AnthropicRequestTransformer`], so a batch item
//! is byte-for-byte the request a synchronous call would send (minus streaming).
//!
//! Results are JSONL, one `{"custom_id", "result": {"type", "message" | "error"}}`
//! object per line.

use tracing::debug;

use crate::error::LlmError;
use crate::execution::transformers::batch::{
    BatchRequestTransformer, BatchResultTransformer, SubmissionPayload, annotate_item_error,
    batch_error_from_value, ensure_not_empty, parse_line_object, scalar_to_string,
};
use crate::execution::transformers::{request::RequestTransformer, response::ResponseTransformer};
use crate::types::{BatchRequest, BatchResult, BatchResultContent, BatchResultError, ResultStatus};

use super::transformers::{AnthropicRequestTransformer, AnthropicResponseTransformer};
use super::types::{AnthropicCreateMessageBatchRequest, AnthropicMessageBatchRequest};

/// Encodes a `BatchRequest` into a Message Batches create body.
#[derive(Clone, Default)]
pub struct AnthropicBatchRequestTransformer {
    request: AnthropicRequestTransformer,
}

impl AnthropicBatchRequestTransformer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchRequestTransformer for AnthropicBatchRequestTransformer {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    fn transform_batch(&self, req: &BatchRequest) -> Result<SubmissionPayload, LlmError> {
        ensure_not_empty(req)?;

        let requests = req
            .requests
            .iter()
            .map(|item| {
                let mut params = item.params.clone();
                params.stream = false;
                let body = self
                    .request
                    .transform_chat(&params)
                    .map_err(|e| annotate_item_error(e, &item.custom_id))?;
                Ok(AnthropicMessageBatchRequest {
                    custom_id: item.custom_id.clone(),
                    params: body,
                })
            })
            .collect::<Result<Vec<_>, LlmError>>()?;
        debug!(items = requests.len(), "encoded anthropic message batch");

        let body = serde_json::to_value(AnthropicCreateMessageBatchRequest { requests })?;
        Ok(SubmissionPayload::Inline(body))
    }
}

/// Decodes one Message Batches result line.
#[derive(Clone, Default)]
pub struct AnthropicBatchResultTransformer {
    response: AnthropicResponseTransformer,
}

impl AnthropicBatchResultTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    fn transform_result_content(
        &self,
        result: &serde_json::Value,
    ) -> Result<BatchResultContent, LlmError> {
        let obj = result.as_object().ok_or_else(|| {
            LlmError::ParseError("Anthropic batch `result` is not an object".to_string())
        })?;

        let status = obj
            .get("type")
            .and_then(|v| v.as_str())
            .map(ResultStatus::parse)
            .unwrap_or(ResultStatus::Unknown);
        let mut content = BatchResultContent::new(status);

        if let Some(message) = obj.get("message").filter(|v| !v.is_null()) {
            content.message = Some(self.response.transform_chat_response(message)?);
        }
        if let Some(error) = obj.get("error").filter(|v| !v.is_null()) {
            content.error = Some(item_error_from_value(error));
        }
        Ok(content)
    }
}

impl BatchResultTransformer for AnthropicBatchResultTransformer {
    fn provider_id(&self) -> &str {
        "anthropic"
    }

    fn transform_result_line(&self, raw: &str) -> Result<BatchResult, LlmError> {
        let mut out = BatchResult::from_raw(raw);
        let obj = parse_line_object(raw)?;

        let result = obj.get("result").filter(|v| !v.is_null());
        let error = obj.get("error").filter(|v| !v.is_null());
        if result.is_none() && error.is_none() {
            return Err(LlmError::ParseError(
                "Anthropic batch line has neither `result` nor `error`".to_string(),
            ));
        }

        out.custom_id = obj
            .get("custom_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        out.id = obj.get("id").and_then(scalar_to_string);
        if let Some(result) = result {
            out.result = Some(self.transform_result_content(result)?);
        }
        out.error = error.and_then(batch_error_from_value);
        Ok(out)
    }
}

/// Per-item errors arrive wrapped in the API error envelope
/// (`{"type":"error","error":{"type":..,"message":..}}`); unwrap it when present.
fn item_error_from_value(value: &serde_json::Value) -> BatchResultError {
    let inner = value
        .get("error")
        .filter(|v| v.is_object())
        .unwrap_or(value);
    match inner {
        serde_json::Value::String(message) => BatchResultError {
            error_type: String::new(),
            message: message.clone(),
            code: None,
            status_code: None,
        },
        other => BatchResultError {
            error_type: other
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            message: other
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            code: other.get("code").and_then(scalar_to_string),
            status_code: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, ChatRequest, Tool};
    use proptest::prelude::*;
    use serde_json::json;

    fn chat(text: &str) -> ChatRequest {
        ChatRequest::builder()
            .model("claude-3-5-haiku-latest")
            .message(ChatMessage::user(text).build())
            .max_tokens(256)
            .build()
    }

    #[test]
    fn encodes_one_entry_per_item_with_custom_ids() {
        let req = BatchRequest::new()
            .with_item("a", chat("one"))
            .with_item("b", chat("two"))
            .with_item("c", chat("three"));
        let payload = AnthropicBatchRequestTransformer::new()
            .transform_batch(&req)
            .unwrap();
        let body = payload.as_inline().unwrap();
        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 3);
        let ids: Vec<&str> = requests
            .iter()
            .map(|r| r["custom_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn params_match_the_synchronous_request_body() {
        let params = chat("same shape");
        let req = BatchRequest::new().with_item("x", params.clone().with_streaming(true));
        let payload = AnthropicBatchRequestTransformer::new()
            .transform_batch(&req)
            .unwrap();
        let sync_body = AnthropicRequestTransformer::new()
            .transform_chat(&params)
            .unwrap();
        assert_eq!(payload.as_inline().unwrap()["requests"][0]["params"], sync_body);
    }

    #[test]
    fn one_bad_item_fails_the_whole_batch() {
        let bad = chat("x").with_tools(vec![Tool::function("t", "", json!(["not", "object"]))]);
        let req = BatchRequest::new()
            .with_item("ok", chat("fine"))
            .with_item("broken", bad);
        match AnthropicBatchRequestTransformer::new().transform_batch(&req) {
            Err(LlmError::InvalidParameter(m)) => assert!(m.contains("broken")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            AnthropicBatchRequestTransformer::new().transform_batch(&BatchRequest::new()),
            Err(LlmError::InvalidInput(_))
        ));
    }

    #[test]
    fn decodes_succeeded_line() {
        let raw = r#"{"custom_id":"req-1","result":{"type":"succeeded","message":{"id":"msg_1","type":"message","role":"assistant","model":"claude-3-5-haiku-latest","content":[{"type":"text","text":"Hello"}],"stop_reason":"end_turn","usage":{"input_tokens":4,"output_tokens":2}}}}"#;
        let r = AnthropicBatchResultTransformer::new()
            .transform_result_line(raw)
            .unwrap();
        assert_eq!(r.custom_id, "req-1");
        assert_eq!(r.status(), ResultStatus::Succeeded);
        assert_eq!(r.message().unwrap().content_text(), Some("Hello"));
        assert_eq!(r.raw_response, raw);
    }

    #[test]
    fn decodes_errored_line_and_unwraps_envelope() {
        let raw = r#"{"custom_id":"req-2","result":{"type":"errored","error":{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens too large"}}}}"#;
        let r = AnthropicBatchResultTransformer::new()
            .transform_result_line(raw)
            .unwrap();
        assert_eq!(r.status(), ResultStatus::Errored);
        let err = r.item_error().unwrap();
        assert_eq!(err.error_type, "invalid_request_error");
        assert_eq!(err.message, "max_tokens too large");
        assert!(r.error.is_none());
    }

    #[test]
    fn missing_custom_id_defaults_to_empty() {
        let r = AnthropicBatchResultTransformer::new()
            .transform_result_line(r#"{"result":{"type":"expired"}}"#)
            .unwrap();
        assert_eq!(r.custom_id, "");
        assert_eq!(r.status(), ResultStatus::Expired);
    }

    #[test]
    fn top_level_error_is_kept_apart_from_item_error() {
        let r = AnthropicBatchResultTransformer::new()
            .transform_result_line(
                r#"{"custom_id":"z","error":{"type":"api_error","message":"internal"}}"#,
            )
            .unwrap();
        assert!(r.result.is_none());
        assert_eq!(r.error.as_ref().unwrap().message, "internal");
        assert_eq!(r.status(), ResultStatus::Errored);
    }

    #[test]
    #[tracing_test::traced_test]
    fn malformed_line_is_dropped_by_decode() {
        let t = AnthropicBatchResultTransformer::new();
        assert!(t.decode(r#"{"custom_id":"x","result":"#).is_none());
        assert!(logs_contain("dropping undecodable batch result line"));
    }

    proptest! {
        #[test]
        fn unknown_result_types_fail_open(kind in "[a-z_]{1,16}") {
            prop_assume!(!["succeeded", "errored", "canceled", "cancelled", "expired"].contains(&kind.as_str()));
            let raw = format!(r#"{{"custom_id":"p","result":{{"type":"{kind}"}}}}"#);
            let r = AnthropicBatchResultTransformer::new().decode(&raw).unwrap();
            prop_assert_eq!(r.status(), ResultStatus::Unknown);
            prop_assert_eq!(r.raw_response, raw);
        }
    }
}
