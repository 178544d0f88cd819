//! OpenAI Batch API adapters
//!
//! Submission is a JSONL input file, one
//! `{"custom_id", "method": "POST", "url": "/v1/chat/completions", "body"}` per line,
//! uploaded with `purpose=batch` before the job is created.
//!
//! Output files are JSONL as well:
//! `{"id", "custom_id", "response": {"status_code", "request_id", "body"}, "error"}`.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::defaults::providers::OPENAI_BATCH_ENDPOINT;
use crate::error::LlmError;
use crate::execution::transformers::batch::{
    BatchRequestTransformer, BatchResultTransformer, SubmissionPayload, annotate_item_error,
    batch_error_from_value, ensure_not_empty, parse_line_object, scalar_to_string,
};
use crate::execution::transformers::{request::RequestTransformer, response::ResponseTransformer};
use crate::types::{
    BatchError, BatchRequest, BatchResult, BatchResultContent, BatchResultError, ResultStatus,
};

use super::transformers::{OpenAiRequestTransformer, OpenAiResponseTransformer};
use super::types::OpenAiBatchRequestLine;

/// Encodes a `BatchRequest` as a JSONL input file.
#[derive(Clone, Default)]
pub struct OpenAiBatchRequestTransformer {
    request: OpenAiRequestTransformer,
}

impl OpenAiBatchRequestTransformer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchRequestTransformer for OpenAiBatchRequestTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_batch(&self, req: &BatchRequest) -> Result<SubmissionPayload, LlmError> {
        ensure_not_empty(req)?;

        let mut buf = BytesMut::new();
        for item in &req.requests {
            // The Batch API rejects streamed requests.
            let mut params = item.params.clone();
            params.stream = false;
            let body = self
                .request
                .transform_chat(&params)
                .map_err(|e| annotate_item_error(e, &item.custom_id))?;
            let line = OpenAiBatchRequestLine {
                custom_id: &item.custom_id,
                method: "POST",
                url: OPENAI_BATCH_ENDPOINT,
                body,
            };
            serde_json::to_writer((&mut buf).writer(), &line)?;
            buf.put_u8(b'\n');
        }
        debug!(
            items = req.len(),
            bytes = buf.len(),
            "encoded openai batch input file"
        );
        Ok(SubmissionPayload::JsonLines(buf.freeze()))
    }
}

/// Decodes one line of a batch output (or error) file.
#[derive(Clone, Default)]
pub struct OpenAiBatchResultTransformer {
    response: OpenAiResponseTransformer,
}

impl OpenAiBatchResultTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    fn transform_response(
        &self,
        response: &serde_json::Value,
    ) -> Result<BatchResultContent, LlmError> {
        let status_code = response
            .get("status_code")
            .and_then(|v| v.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .ok_or_else(|| {
                LlmError::ParseError("OpenAI batch response has no status_code".to_string())
            })?;
        let body = response.get("body").unwrap_or(&serde_json::Value::Null);

        if (200..300).contains(&status_code) {
            let mut content = BatchResultContent::new(ResultStatus::Succeeded);
            content.message = Some(self.response.transform_chat_response(body)?);
            return Ok(content);
        }

        let mut content = BatchResultContent::new(ResultStatus::Errored);
        let error = body.get("error").unwrap_or(body);
        content.error = Some(BatchResultError {
            error_type: error
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            message: error
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            code: error.get("code").and_then(scalar_to_string),
            status_code: Some(status_code),
        });
        Ok(content)
    }
}

impl BatchResultTransformer for OpenAiBatchResultTransformer {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn transform_result_line(&self, raw: &str) -> Result<BatchResult, LlmError> {
        let mut out = BatchResult::from_raw(raw);
        let obj = parse_line_object(raw)?;

        let response = obj.get("response").filter(|v| !v.is_null());
        let error = obj.get("error").filter(|v| !v.is_null());
        if response.is_none() && error.is_none() {
            return Err(LlmError::ParseError(
                "OpenAI batch line has neither `response` nor `error`".to_string(),
            ));
        }

        out.custom_id = obj
            .get("custom_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        out.id = obj.get("id").and_then(scalar_to_string);
        out.error = error.and_then(batch_error_from_value);
        out.result = match response {
            Some(response) => Some(self.transform_response(response)?),
            None => out.error.as_ref().and_then(terminal_status_from_error),
        };
        Ok(out)
    }
}

/// Requests that never ran are reported as top-level errors with these codes.
fn terminal_status_from_error(error: &BatchError) -> Option<BatchResultContent> {
    match error.code.as_deref() {
        Some("batch_expired") => Some(BatchResultContent::new(ResultStatus::Expired)),
        Some("batch_cancelled") => Some(BatchResultContent::new(ResultStatus::Cancelled)),
        _ => None,
    }
}
