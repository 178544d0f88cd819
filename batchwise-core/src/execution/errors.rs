//! HTTP error classification

use reqwest::header::HeaderMap;

use crate::error::LlmError;

const REQUEST_ID_HEADERS: [&str; 5] = [
    "request-id",
    "x-request-id",
    "x-openai-request-id",
    "x-trace-id",
    "x-correlation-id",
];

/// Classify a non-success HTTP response into a typed `LlmError`.
///
/// The message carries the provider, URL, status and a short body sample so
/// failures are diagnosable from the error alone. Request/trace ids found in
/// the response headers are appended.
pub fn classify_http_error(
    provider_id: &str,
    url: &str,
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
    fallback_message: Option<&str>,
) -> LlmError {
    let ids: Vec<String> = REQUEST_ID_HEADERS
        .iter()
        .filter_map(|k| {
            headers
                .get(*k)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{k}={v}"))
        })
        .collect();
    let ids_suffix = if ids.is_empty() {
        String::new()
    } else {
        format!(" ids=[{}]", ids.join(","))
    };
    // Limit body sample size to avoid noisy logs
    let body_sample = body_text.chars().take(200).collect::<String>();
    let context = format!("provider={provider_id} url={url} http={status}{ids_suffix}");

    match status {
        429 => {
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            LlmError::RateLimitError(format!(
                "{context} retry_after={retry_after} body_sample={body_sample}"
            ))
        }
        401 | 403 => {
            LlmError::AuthenticationError(format!("{context} body_sample={body_sample}"))
        }
        404 => LlmError::NotFound(format!("{context} body_sample={body_sample}")),
        413 => LlmError::InvalidInput(format!(
            "{context} payload too large body_sample={body_sample}"
        )),
        _ => {
            let message = match fallback_message {
                Some(msg) => format!("{context} {msg}"),
                None if body_text.trim().is_empty() => format!("{context} api error"),
                None => format!("{context} body_sample={body_sample}"),
            };
            let body = serde_json::from_str::<serde_json::Value>(body_text)
                .unwrap_or_else(|_| serde_json::Value::String(body_sample.clone()));
            LlmError::api_error_with_details(
                status,
                message,
                serde_json::json!({
                    "provider": provider_id,
                    "url": url,
                    "body": body,
                }),
            )
        }
    }
}
