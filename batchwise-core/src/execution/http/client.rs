//! HTTP client construction from `HttpConfig`.

use crate::error::LlmError;
use crate::types::HttpConfig;

/// Build a `reqwest::Client` from `HttpConfig`.
///
/// `HttpConfig::timeout` is not installed client-wide. [`ReqwestTransport`]
/// applies it per request to buffered calls; streamed calls are bounded only
/// by `stream_read_timeout` between reads.
///
/// [`ReqwestTransport`]: super::ReqwestTransport
pub fn build_http_client_from_config(cfg: &HttpConfig) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();

    if let Some(connect_timeout) = cfg.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(read_timeout) = cfg.stream_read_timeout {
        builder = builder.read_timeout(read_timeout);
    }
    if let Some(proxy_url) = &cfg.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if let Some(user_agent) = &cfg.user_agent {
        builder = builder.user_agent(user_agent);
    }

    // Default headers
    if !cfg.headers.is_empty() {
        let mut headers = reqwest::header::HeaderMap::new();
        for (k, v) in &cfg.headers {
            let name = reqwest::header::HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header name '{k}': {e}"))
            })?;
            let value = reqwest::header::HeaderValue::from_str(v).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header value for '{k}': {e}"))
            })?;
            headers.insert(name, value);
        }
        builder = builder.default_headers(headers);
    }

    builder
        .build()
        .map_err(|e| LlmError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_proxy() {
        let cfg = HttpConfig::builder().proxy(Some("::not a url::")).build();
        assert!(matches!(
            build_http_client_from_config(&cfg),
            Err(LlmError::ConfigurationError(_))
        ));
    }

    #[test]
    fn rejects_invalid_default_header() {
        let cfg = HttpConfig::builder().header("bad header", "v").build();
        assert!(build_http_client_from_config(&cfg).is_err());
    }

    #[test]
    fn default_config_builds() {
        assert!(build_http_client_from_config(&HttpConfig::default()).is_ok());
    }
}
