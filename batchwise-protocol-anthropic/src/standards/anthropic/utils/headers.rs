use super::*;

/// Build Anthropic request headers.
///
/// `anthropic-beta` is forwarded from custom headers unchanged.
pub fn build_headers(
    api_key: &str,
    anthropic_version: &str,
    custom_headers: &std::collections::HashMap<String, String>,
) -> Result<HeaderMap, LlmError> {
    let builder = HttpHeaderBuilder::new()
        .with_custom_auth("x-api-key", api_key)?
        .with_json_content_type()
        .with_header("anthropic-version", anthropic_version)?
        .with_custom_headers(custom_headers)?;
    Ok(builder.build())
}
