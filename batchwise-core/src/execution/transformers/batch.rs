//! Batch transformation traits
//!
//! A batch request transformer turns a `BatchRequest` into whatever the
//! provider accepts for submission. A batch result transformer turns one raw
//! line of a result stream into a `BatchResult`.
//!
//! Result decoding never aborts a stream: [`BatchResultTransformer::decode`]
//! tries the provider's structured path first, then the canonical serde shape,
//! and finally drops the line with a warning.

use bytes::Bytes;
use tracing::warn;

use crate::error::LlmError;
use crate::types::{BatchError, BatchRequest, BatchResult};

/// Encoded submission, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPayload {
    /// One JSON document posted directly as the create-job body.
    Inline(serde_json::Value),
    /// Newline-delimited JSON, uploaded as a file before the job is created.
    JsonLines(Bytes),
}

impl SubmissionPayload {
    pub fn as_inline(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Inline(v) => Some(v),
            Self::JsonLines(_) => None,
        }
    }

    pub fn as_json_lines(&self) -> Option<&Bytes> {
        match self {
            Self::JsonLines(b) => Some(b),
            Self::Inline(_) => None,
        }
    }
}

/// Encode a canonical batch into the provider's submission payload.
pub trait BatchRequestTransformer: Send + Sync {
    fn provider_id(&self) -> &str;

    /// Encode every item. Fails as a whole if any single item fails.
    fn transform_batch(&self, req: &BatchRequest) -> Result<SubmissionPayload, LlmError>;
}

/// Decode raw result lines into canonical results.
pub trait BatchResultTransformer: Send + Sync {
    fn provider_id(&self) -> &str;

    /// Structured, provider-specific decoding of one line.
    fn transform_result_line(&self, raw: &str) -> Result<BatchResult, LlmError>;

    /// Structured decoding with canonical fallback.
    ///
    /// Returns `None` only when both paths fail; the line is logged and skipped.
    fn decode(&self, raw: &str) -> Option<BatchResult> {
        let structured = match self.transform_result_line(raw) {
            Ok(result) => return Some(result),
            Err(e) => e,
        };
        match decode_canonical(raw) {
            Ok(result) => Some(result),
            Err(fallback) => {
                warn!(
                    provider = self.provider_id(),
                    error = %structured,
                    fallback_error = %fallback,
                    sample = %truncate_for_log(raw, 200),
                    "dropping undecodable batch result line"
                );
                None
            }
        }
    }
}

/// Decode a line directly into the canonical `BatchResult` shape.
///
/// `raw_response` is always overwritten with the input line.
pub fn decode_canonical(raw: &str) -> Result<BatchResult, LlmError> {
    let mut result: BatchResult = serde_json::from_str(raw)
        .map_err(|e| LlmError::ParseError(format!("not a canonical batch result: {e}")))?;
    result.raw_response = raw.to_string();
    Ok(result)
}

/// Parse a raw line as a JSON object.
pub fn parse_line_object(
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, LlmError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(LlmError::ParseError(format!(
            "batch result line is not a JSON object (got {})",
            json_kind(&other)
        ))),
        Err(e) => Err(LlmError::ParseError(format!(
            "batch result line is not valid JSON: {e}"
        ))),
    }
}

/// Build a top-level `BatchError` from a JSON value.
///
/// Accepts `{code, message, type}` objects (numeric codes are stringified) and
/// bare strings. `null` yields `None`.
pub fn batch_error_from_value(value: &serde_json::Value) -> Option<BatchError> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(BatchError {
            code: None,
            message: message.clone(),
            error_type: None,
        }),
        serde_json::Value::Object(map) => Some(BatchError {
            code: map.get("code").and_then(scalar_to_string),
            message: map
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            error_type: map.get("type").and_then(|v| v.as_str()).map(str::to_string),
        }),
        other => Some(BatchError {
            code: None,
            message: other.to_string(),
            error_type: None,
        }),
    }
}

/// String form of a JSON scalar; `None` for null, arrays and objects.
pub fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reject an empty batch before any encoding happens.
pub fn ensure_not_empty(req: &BatchRequest) -> Result<(), LlmError> {
    if req.is_empty() {
        return Err(LlmError::InvalidInput(
            "batch request must contain at least one item".to_string(),
        ));
    }
    Ok(())
}

/// Prefix an encoding error with the item that caused it, keeping its variant.
pub fn annotate_item_error(err: LlmError, custom_id: &str) -> LlmError {
    let tag = |msg: String| format!("batch item '{custom_id}': {msg}");
    match err {
        LlmError::InvalidInput(m) => LlmError::InvalidInput(tag(m)),
        LlmError::InvalidParameter(m) => LlmError::InvalidParameter(tag(m)),
        LlmError::ParseError(m) => LlmError::ParseError(tag(m)),
        LlmError::JsonError(m) => LlmError::JsonError(tag(m)),
        LlmError::UnsupportedOperation(m) => LlmError::UnsupportedOperation(tag(m)),
        other => other,
    }
}

pub(crate) fn truncate_for_log(raw: &str, max_chars: usize) -> String {
    let mut out: String = raw.chars().take(max_chars).collect();
    if raw.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
