//! Batch client construction
//!
//! `BatchClientBuilder` resolves credentials, endpoint and transport, then
//! selects the provider spec once. Everything after `build()` is fixed for
//! the lifetime of the client.
//!
//! Resolution order:
//! - API key: explicit value, then `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`.
//! - Base URL: explicit value, then `OPENAI_BASE_URL` / `ANTHROPIC_BASE_URL`,
//!   then the provider default.
//! - Transport: explicit transport, else `ReqwestTransport` over the given
//!   `reqwest::Client`, else over a client built from `HttpConfig`.
//!
//! # Example
//! ```rust,no_run
//! use batchwise::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), LlmError> {
//! let client = BatchClient::builder()
//!     .anthropic()
//!     .api_key("sk-ant-...")
//!     .http_config(
//!         HttpConfig::builder()
//!             .timeout(Some(Duration::from_secs(60)))
//!             .build(),
//!     )
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::client::BatchClient;
use crate::core::ProviderContext;
use crate::error::LlmError;
use crate::execution::executors::BatchExecutorBuilder;
use crate::execution::http::{HttpTransport, ReqwestTransport, build_http_client_from_config};
use crate::provider::BatchProvider;
use crate::types::HttpConfig;

/// Builder for [`BatchClient`].
#[derive(Clone, Default)]
pub struct BatchClientBuilder {
    provider: Option<BatchProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    http_config: HttpConfig,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
    anthropic_version: Option<String>,
    completion_window: Option<String>,
    organization: Option<String>,
    project: Option<String>,
}

impl BatchClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: BatchProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    #[cfg(feature = "openai")]
    pub fn openai(self) -> Self {
        self.provider(BatchProvider::OpenAi)
    }

    #[cfg(feature = "anthropic")]
    pub fn anthropic(self) -> Self {
        self.provider(BatchProvider::Anthropic)
    }

    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Base URL including the API version segment, e.g. `https://api.openai.com/v1`.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// HTTP settings. Ignored for the client when `http_client` is set, but
    /// its headers and request timeout still apply.
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Route every request through a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// `anthropic-version` header value. Anthropic only.
    pub fn anthropic_version<S: Into<String>>(mut self, version: S) -> Self {
        self.anthropic_version = Some(version.into());
        self
    }

    /// Completion window for new jobs. OpenAI only; defaults to `24h`.
    pub fn completion_window<S: Into<String>>(mut self, window: S) -> Self {
        self.completion_window = Some(window.into());
        self
    }

    /// `OpenAI-Organization` header value. OpenAI only.
    pub fn organization<S: Into<String>>(mut self, organization: S) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// `OpenAI-Project` header value. OpenAI only.
    pub fn project<S: Into<String>>(mut self, project: S) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn build(self) -> Result<BatchClient, LlmError> {
        let provider = self.provider.ok_or_else(|| {
            LlmError::ConfigurationError("no batch provider selected".to_string())
        })?;

        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(provider.api_key_env()).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LlmError::MissingApiKey(format!(
                    "{provider} API key not provided; set it on the builder or via {}",
                    provider.api_key_env()
                ))
            })?;

        let base_url = self
            .base_url
            .clone()
            .or_else(|| std::env::var(provider.base_url_env()).ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let transport: Arc<dyn HttpTransport> = match self.transport.clone() {
            Some(transport) => transport,
            None => {
                let client = match self.http_client.clone() {
                    Some(client) => client,
                    None => build_http_client_from_config(&self.http_config)?,
                };
                Arc::new(ReqwestTransport::new(client).with_request_timeout(self.http_config.timeout))
            }
        };

        let context = self.provider_context(provider, &base_url, api_key);
        let executor = BatchExecutorBuilder::new(provider.id(), transport)
            .with_spec(provider.spec())
            .with_context(context)
            .build()?;

        debug!(provider = %provider, base_url = %base_url, "built batch client");
        Ok(BatchClient::new(provider, executor))
    }

    fn provider_context(
        &self,
        provider: BatchProvider,
        base_url: &str,
        api_key: String,
    ) -> ProviderContext {
        #[allow(unused_mut)]
        let mut context = ProviderContext::new(
            provider.id(),
            base_url,
            Some(api_key),
            self.http_config.headers.clone(),
        );

        #[cfg(feature = "anthropic")]
        if let Some(version) = &self.anthropic_version {
            use batchwise_protocol_anthropic::standards::anthropic::spec::ANTHROPIC_VERSION_EXTRA;
            context = context.with_extra(ANTHROPIC_VERSION_EXTRA, version.clone().into());
        }

        #[cfg(feature = "openai")]
        {
            use batchwise_protocol_openai::standards::openai::spec::{
                COMPLETION_WINDOW_EXTRA, ORGANIZATION_EXTRA, PROJECT_EXTRA,
            };
            if let Some(window) = &self.completion_window {
                context = context.with_extra(COMPLETION_WINDOW_EXTRA, window.clone().into());
            }
            if let Some(org) = &self.organization {
                context = context.with_extra(ORGANIZATION_EXTRA, org.clone().into());
            }
            if let Some(project) = &self.project {
                context = context.with_extra(PROJECT_EXTRA, project.clone().into());
            }
        }

        context
    }
}

impl std::fmt::Debug for BatchClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchClientBuilder")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .field("custom_http_client", &self.http_client.is_some())
            .field("custom_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_is_required() {
        match BatchClientBuilder::new().api_key("k").build() {
            Err(LlmError::ConfigurationError(msg)) => assert!(msg.contains("provider")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    #[cfg(feature = "anthropic")]
    fn explicit_settings_win_and_trailing_slash_is_trimmed() {
        let client = BatchClientBuilder::new()
            .anthropic()
            .api_key("sk-ant-test")
            .base_url("http://localhost:9999/v1/")
            .build()
            .unwrap();
        assert_eq!(client.provider(), BatchProvider::Anthropic);
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }

    #[test]
    #[cfg(feature = "openai")]
    fn provider_extras_land_in_context() {
        let builder = BatchClientBuilder::new()
            .openai()
            .completion_window("24h")
            .organization("org-1")
            .project("proj-1");
        let ctx = builder.provider_context(BatchProvider::OpenAi, "http://h/v1", "sk".into());
        assert_eq!(ctx.extra_str("openai.completion_window"), Some("24h"));
        assert_eq!(ctx.extra_str("openai.organization"), Some("org-1"));
        assert_eq!(ctx.extra_str("openai.project"), Some("proj-1"));
    }

    #[test]
    fn debug_output_masks_api_key() {
        let builder = BatchClientBuilder::new().api_key("sk-very-secret");
        assert!(!format!("{builder:?}").contains("sk-very-secret"));
    }
}
