use crate::error::LlmError;
use serde_json::Value;

/// Classify OpenAI HTTP errors by parsing the standard error envelope.
///
/// OpenAI returns:
/// `{ "error": { "message": "...", "type": "...", "code": "..." } }`
///
/// Returns `None` when the body doesn't match the envelope so callers
/// can fall back to the generic classifier.
pub fn classify_openai_http_error(provider: &str, status: u16, body_text: &str) -> Option<LlmError> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;

    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error");
    let error_type = error_obj.get("type").and_then(|v| v.as_str());
    let details = json.clone();

    // Prefer structured `type`, otherwise fall back to message heuristics.
    let mapped = match error_type.unwrap_or("") {
        "authentication_error" => LlmError::AuthenticationError(message.to_string()),
        "rate_limit_error" => LlmError::RateLimitError(message.to_string()),
        "invalid_request_error" if status == 404 => LlmError::NotFound(message.to_string()),
        "invalid_request_error" => LlmError::InvalidInput(message.to_string()),
        "not_found_error" => LlmError::NotFound(message.to_string()),
        "insufficient_quota" => LlmError::ApiError {
            code: status,
            message: format!("{provider} quota exceeded: {message}"),
            details: Some(details),
        },
        "" => map_openai_message_heuristics(provider, status, message, details),
        other => LlmError::ApiError {
            code: status,
            message: format!("{provider} API error ({other}): {message}"),
            details: Some(details),
        },
    };

    Some(mapped)
}

fn map_openai_message_heuristics(
    provider: &str,
    status: u16,
    message: &str,
    details: Value,
) -> LlmError {
    let lower = message.to_lowercase();

    if status == 401 || lower.contains("api key") || lower.contains("unauthorized") {
        return LlmError::AuthenticationError(message.to_string());
    }

    if status == 429 || lower.contains("rate limit") {
        return LlmError::RateLimitError(message.to_string());
    }

    if status == 404 {
        return LlmError::NotFound(message.to_string());
    }

    if status == 400 {
        return LlmError::InvalidInput(message.to_string());
    }

    LlmError::ApiError {
        code: status,
        message: format!("{provider} API error: {message}"),
        details: Some(details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_error_mapping_invalid_request_error() {
        let body =
            r#"{"error":{"message":"bad request","type":"invalid_request_error","code":null}}"#;
        let err = classify_openai_http_error("openai", 400, body).expect("classified");
        match err {
            LlmError::InvalidInput(msg) => assert_eq!(msg, "bad request"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn openai_error_mapping_missing_batch_is_not_found() {
        let body = r#"{"error":{"message":"No batch found with id 'batch_x'.","type":"invalid_request_error","param":null,"code":null}}"#;
        assert!(matches!(
            classify_openai_http_error("openai", 404, body),
            Some(LlmError::NotFound(_))
        ));
    }

    #[test]
    fn openai_error_mapping_untyped_server_error_keeps_status() {
        let body = r#"{"error":{"message":"upstream failed","type":null}}"#;
        match classify_openai_http_error("openai", 502, body).expect("classified") {
            LlmError::ApiError { code, message, .. } => {
                assert_eq!(code, 502);
                assert!(message.contains("upstream failed"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn non_envelope_body_is_left_to_generic_classification() {
        assert!(classify_openai_http_error("openai", 500, "oops").is_none());
        assert!(classify_openai_http_error("openai", 500, r#"{"detail":"x"}"#).is_none());
    }
}
