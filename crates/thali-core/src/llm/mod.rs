//! LLM integration
//!
//! Provides the generation-service trait and an OpenAI-compatible HTTP
//! client supporting buffered and streamed completions.

mod client;
mod sse;
mod traits;

pub use client::OpenAIClient;
pub use sse::{parse_chunk, SseDecoder, StreamEvent};
pub use traits::*;
