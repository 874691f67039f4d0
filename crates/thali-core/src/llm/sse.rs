//! Server-sent event decoding for streamed chat completions

use crate::error::{Result, ThaliError};
use serde::Deserialize;

/// Splits a byte stream into SSE `data` payloads.
///
/// Bytes are buffered until a full line arrives, so multi-byte characters
/// split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every event completed by them
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
            } else if let Some(rest) = line.strip_prefix("data:") {
                self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            }
            // comments (":") and other fields are ignored
        }

        events
    }

    /// Flush a trailing event the server did not terminate
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            if let Some(data) = line.trim_end().strip_prefix("data:") {
                self.data.push(data.trim_start().to_string());
            }
        }

        if self.data.is_empty() {
            None
        } else {
            let event = self.data.join("\n");
            self.data.clear();
            Some(event)
        }
    }
}

/// A decoded streaming chunk
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Content delta; `None` for role-only or finish chunks
    Delta(Option<String>),
    /// Terminal `[DONE]` marker
    Done,
}

/// Parse one `data` payload of an OpenAI-style completion stream
pub fn parse_chunk(data: &str) -> Result<StreamEvent> {
    #[derive(Deserialize)]
    struct Chunk {
        #[serde(default)]
        choices: Vec<ChunkChoice>,
        #[serde(default)]
        error: Option<serde_json::Value>,
    }

    #[derive(Deserialize)]
    struct ChunkChoice {
        #[serde(default)]
        delta: Delta,
    }

    #[derive(Deserialize, Default)]
    struct Delta {
        #[serde(default)]
        content: Option<String>,
    }

    let data = data.trim();
    if data == "[DONE]" {
        return Ok(StreamEvent::Done);
    }

    let chunk: Chunk = serde_json::from_str(data)
        .map_err(|e| ThaliError::Llm(format!("Malformed stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(ThaliError::ExternalError(format!(
            "LLM service stream error: {}",
            error
        )));
    }

    Ok(StreamEvent::Delta(
        chunk.choices.into_iter().next().and_then(|c| c.delta.content),
    ))
}
