//! Default Configuration Values
//!
//! Centralizes default values used throughout batchwise.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default timeout for non-streaming requests (create, upload, retrieve, delete).
    ///
    /// Uploads of large JSONL files can take a while, so this is more generous
    /// than an interactive chat timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default per-read timeout for streamed result downloads.
    ///
    /// Result streams are unbounded, so only the gap between two reads is limited.
    pub const STREAM_READ_TIMEOUT: Duration = Duration::from_secs(300);

    /// Longest result line accepted before the stream fails.
    pub const MAX_RESULT_LINE_BYTES: usize = 8 * 1024 * 1024;

    /// How much of an error body is read for classification.
    pub const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("batchwise/", env!("CARGO_PKG_VERSION"));
}

/// Provider endpoint defaults
pub mod providers {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// Endpoint every OpenAI batch line targets.
    pub const OPENAI_BATCH_ENDPOINT: &str = "/v1/chat/completions";

    /// The only completion window OpenAI currently accepts.
    pub const OPENAI_COMPLETION_WINDOW: &str = "24h";

    /// File name used for the uploaded JSONL payload.
    pub const OPENAI_BATCH_FILE_NAME: &str = "batch.jsonl";
}
