//! Supported batch providers
//!
//! Each provider is a plain value describing its defaults. The protocol
//! mapping itself lives in the `batchwise-protocol-*` crates and is picked
//! once, when a `BatchClient` is built.

use std::sync::Arc;

use crate::core::BatchProviderSpec;
use crate::defaults::providers;

/// Provider family a `BatchClient` talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchProvider {
    /// JSONL file upload, then job creation (`/files` + `/batches`).
    #[cfg(feature = "openai")]
    OpenAi,
    /// Inline submission to Message Batches (`/messages/batches`).
    #[cfg(feature = "anthropic")]
    Anthropic,
}

impl BatchProvider {
    pub const fn id(&self) -> &'static str {
        match *self {
            #[cfg(feature = "openai")]
            Self::OpenAi => "openai",
            #[cfg(feature = "anthropic")]
            Self::Anthropic => "anthropic",
        }
    }

    pub const fn default_base_url(&self) -> &'static str {
        match *self {
            #[cfg(feature = "openai")]
            Self::OpenAi => providers::OPENAI_BASE_URL,
            #[cfg(feature = "anthropic")]
            Self::Anthropic => providers::ANTHROPIC_BASE_URL,
        }
    }

    /// Environment variable consulted when no API key is set explicitly.
    pub const fn api_key_env(&self) -> &'static str {
        match *self {
            #[cfg(feature = "openai")]
            Self::OpenAi => "OPENAI_API_KEY",
            #[cfg(feature = "anthropic")]
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Environment variable consulted when no base URL is set explicitly.
    pub const fn base_url_env(&self) -> &'static str {
        match *self {
            #[cfg(feature = "openai")]
            Self::OpenAi => "OPENAI_BASE_URL",
            #[cfg(feature = "anthropic")]
            Self::Anthropic => "ANTHROPIC_BASE_URL",
        }
    }

    pub(crate) fn spec(&self) -> Arc<dyn BatchProviderSpec> {
        match *self {
            #[cfg(feature = "openai")]
            Self::OpenAi => Arc::new(batchwise_protocol_openai::standards::openai::OpenAiBatchSpec),
            #[cfg(feature = "anthropic")]
            Self::Anthropic => {
                Arc::new(batchwise_protocol_anthropic::standards::anthropic::AnthropicBatchSpec)
            }
        }
    }
}

impl std::fmt::Display for BatchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for BatchProvider {
    type Err = crate::LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            #[cfg(feature = "openai")]
            "openai" => Ok(Self::OpenAi),
            #[cfg(feature = "anthropic")]
            "anthropic" => Ok(Self::Anthropic),
            other => Err(crate::LlmError::ConfigurationError(format!(
                "unknown or disabled batch provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(feature = "openai", feature = "anthropic"))]
    fn parses_provider_ids() {
        assert_eq!("OpenAI".parse::<BatchProvider>().unwrap(), BatchProvider::OpenAi);
        assert_eq!(
            " anthropic ".parse::<BatchProvider>().unwrap(),
            BatchProvider::Anthropic
        );
        assert!("gemini".parse::<BatchProvider>().is_err());
    }

    #[test]
    #[cfg(feature = "anthropic")]
    fn spec_matches_provider_id() {
        let p = BatchProvider::Anthropic;
        assert_eq!(p.spec().id(), p.id());
        assert_eq!(p.default_base_url(), "https://api.anthropic.com/v1");
        assert_eq!(p.to_string(), "anthropic");
    }
}
