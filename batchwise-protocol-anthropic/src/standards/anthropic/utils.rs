//! Anthropic Utility Functions
//!
//! Common utility functions for Anthropic Claude API interactions.

use super::types::*;
use crate::error::LlmError;
use crate::execution::http::headers::HttpHeaderBuilder;
use crate::types::*;
use reqwest::header::HeaderMap;

mod errors;
mod finish;
mod headers;
mod messages;
mod parse;
mod tool_choice;
mod tools;

pub use errors::{classify_anthropic_http_error, map_anthropic_error};
pub use finish::parse_finish_reason;
pub use headers::build_headers;
pub use messages::convert_messages;
pub use parse::{create_usage_from_response, parse_response_content_and_tools};
pub use tool_choice::convert_tool_choice;
pub use tools::convert_tools_to_anthropic_format;
