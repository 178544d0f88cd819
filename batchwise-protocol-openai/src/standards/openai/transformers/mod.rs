//! OpenAI protocol transformers
//!
//! Chat Completions wire format mapping. The batch adapters call these for
//! every item so batch and synchronous bodies stay identical.

pub mod request;
pub mod response;

pub use request::OpenAiRequestTransformer;
pub use response::OpenAiResponseTransformer;
