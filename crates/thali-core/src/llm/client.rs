//! HTTP client for OpenAI-compatible chat completion services

use super::sse::{parse_chunk, SseDecoder, StreamEvent};
use super::{ChatMessage, GenerationParams, LLMClient, TextStream};
use crate::config::LLMServiceConfig;
use crate::error::{Result, ThaliError};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// OpenAI/vLLM-compatible client
pub struct OpenAIClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl OpenAIClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ThaliError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(LLMServiceConfig::default())
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.url.trim_end_matches('/')
        )
    }

    /// Send a completion request and check the status line
    async fn send(&self, request: &ChatRequest<'_>) -> Result<reqwest::Response> {
        let mut req = self.http_client.post(self.completions_url()).json(request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ThaliError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let start = Instant::now();
        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let response = self.send(&request).await?;
        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ThaliError::Llm("No response from LLM".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!(
            "Chat completion from {} in {}ms ({} chars)",
            self.config.model,
            start.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }

    async fn chat_completion_stream(
        &self,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<TextStream> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: true,
        };

        let response = self.send(&request).await?;
        tracing::debug!("Streaming chat completion from {}", self.config.model);

        // The response body lives inside the stream; dropping the stream
        // closes the connection.
        let stream = async_stream::stream! {
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(ThaliError::Http(e));
                        return;
                    }
                };

                for data in decoder.push(&chunk) {
                    match parse_chunk(&data) {
                        Ok(StreamEvent::Done) => return,
                        Ok(StreamEvent::Delta(Some(text))) => yield Ok(text),
                        Ok(StreamEvent::Delta(None)) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }
            }

            if let Some(data) = decoder.finish() {
                match parse_chunk(&data) {
                    Ok(StreamEvent::Delta(Some(text))) => yield Ok(text),
                    Ok(_) => {}
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(stream))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
