//! Canonical batch types
//!
//! Vendor-neutral shapes for a batch job, its request items and its results.
//! Provider adapters translate to and from these; nothing here knows about a
//! particular wire format.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat::{ChatRequest, ChatResponse};

/// One request inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequestItem {
    /// Caller-assigned id, unique within the batch. Results are joined back on it.
    pub custom_id: String,
    pub params: ChatRequest,
}

impl BatchRequestItem {
    pub fn new(custom_id: impl Into<String>, params: ChatRequest) -> Self {
        Self {
            custom_id: custom_id.into(),
            params,
        }
    }
}

/// A collection of requests submitted as one job.
///
/// `custom_id` uniqueness is not enforced; duplicates come back as ambiguous results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<BatchRequestItem>,
    /// Forwarded to providers that accept job metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, custom_id: impl Into<String>, params: ChatRequest) -> Self {
        self.requests.push(BatchRequestItem::new(custom_id, params));
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = BatchRequestItem>) -> Self {
        self.requests.extend(items);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Job lifecycle status as reported by the provider.
///
/// Parsing is case-insensitive and never fails: unknown strings are kept in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchStatus {
    Validating,
    InProgress,
    Finalizing,
    Completed,
    Failed,
    Cancelling,
    Cancelled,
    Expired,
    Other(String),
}

impl BatchStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "validating" => Self::Validating,
            "in_progress" => Self::InProgress,
            "finalizing" => Self::Finalizing,
            // Anthropic reports a finished job as `ended`.
            "completed" | "ended" => Self::Completed,
            "failed" => Self::Failed,
            "cancelling" | "canceling" => Self::Cancelling,
            "cancelled" | "canceled" => Self::Cancelled,
            "expired" => Self::Expired,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Validating => "validating",
            Self::InProgress => "in_progress",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the provider will make no further progress on this job.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Expired
        )
    }
}

impl From<String> for BatchStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<BatchStatus> for String {
    fn from(status: BatchStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ResultStatus {
    Succeeded,
    Errored,
    Cancelled,
    Expired,
    /// Any provider status outside the known set.
    Unknown,
}

impl ResultStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "errored" => Self::Errored,
            "canceled" | "cancelled" => Self::Cancelled,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Errored => "errored",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for ResultStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ResultStatus> for &'static str {
    fn from(status: ResultStatus) -> Self {
        status.as_str()
    }
}

/// Per-item error reported by the provider inside an otherwise healthy result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResultError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Job-level or transport-level error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Nested outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResultContent {
    #[serde(rename = "type")]
    pub status: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchResultError>,
}

impl BatchResultContent {
    pub fn new(status: ResultStatus) -> Self {
        Self {
            status,
            message: None,
            error: None,
        }
    }
}

/// Canonical per-item result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub custom_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The verbatim source line. Always populated by the decoders.
    #[serde(default)]
    pub raw_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BatchResultContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchError>,
}

impl BatchResult {
    /// Empty result that only remembers the raw line.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            custom_id: String::new(),
            id: None,
            raw_response: raw.into(),
            result: None,
            error: None,
        }
    }

    /// Outcome status; `Errored` when only a top-level error is present.
    pub fn status(&self) -> ResultStatus {
        match (&self.result, &self.error) {
            (Some(content), _) => content.status,
            (None, Some(_)) => ResultStatus::Errored,
            (None, None) => ResultStatus::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == ResultStatus::Succeeded
    }

    pub fn message(&self) -> Option<&ChatResponse> {
        self.result.as_ref().and_then(|r| r.message.as_ref())
    }

    pub fn item_error(&self) -> Option<&BatchResultError> {
        self.result.as_ref().and_then(|r| r.error.as_ref())
    }
}

/// Per-status request counts reported for a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequestCounts {
    pub total: u32,
    pub processing: u32,
    pub succeeded: u32,
    pub errored: u32,
    pub cancelled: u32,
    pub expired: u32,
}

/// Handle to a submitted batch job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: String,
    pub status: BatchStatus,
    /// Where results can be streamed from. Absent until the provider has produced output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_url: Option<String>,
    /// Separate location for failed items, for providers that split them
    /// out of the main results file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_counts: Option<BatchRequestCounts>,
    /// Job-level error returned alongside the handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchError>,
}

impl BatchItem {
    pub fn new(id: impl Into<String>, status: BatchStatus) -> Self {
        Self {
            id: id.into(),
            status,
            results_url: None,
            errors_url: None,
            created_at: None,
            metadata: HashMap::new(),
            request_counts: None,
            error: None,
        }
    }

    pub fn with_results_url(mut self, url: impl Into<String>) -> Self {
        self.results_url = Some(url.into());
        self
    }
}
