//! Text summarization over the Anthropic Messages API.
//!
//! A thin, one-shot client: the caller assembles the prompt, [`Summarizer`]
//! sends a single non-streaming request and hands back the first text block.
//! Any failure is the caller's cue to fall back to an unsummarized report.

mod api_types;
mod config;
mod error;
mod summarizer;

pub use api_types::{
    ApiError, ApiErrorDetails, ContentBlock, MessageParam, MessagesRequest, MessagesResponse,
    Usage,
};
pub use config::{SummarizerConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use error::Error;
pub use summarizer::Summarizer;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
