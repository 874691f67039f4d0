//! Response orchestration
//!
//! [`Responder`] wraps the caller's conversation in the persona and optional
//! grounding context, then asks the generation service for a buffered or
//! streamed answer. Generation errors are returned as-is: there is no
//! fallback text.
//!
//! [`Recommender`] is the conversational entry point, chaining retrieval
//! into the responder.

mod prompt;
mod recommender;

pub use prompt::{grounding_message, SYSTEM_PROMPT};
pub use recommender::{Recommendation, RecommendRequest, Recommender};

use crate::error::Result;
use crate::llm::{ChatMessage, GenerationParams, LLMClient, TextStream};
use futures::StreamExt;
use std::sync::Arc;

/// Sampling temperature for recommendations
pub const TEMPERATURE: f32 = 0.7;
/// Output cap for recommendations
pub const MAX_TOKENS: u32 = 1500;

/// Parameters used for every recommendation request
pub const RECOMMENDATION_PARAMS: GenerationParams = GenerationParams {
    temperature: TEMPERATURE,
    max_tokens: MAX_TOKENS,
};

/// Drives the generation service with the persona and grounding context
#[derive(Clone)]
pub struct Responder {
    client: Arc<dyn LLMClient>,
}

impl Responder {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Persona first, grounding second (when non-empty), conversation last
    pub fn build_messages(conversation: &[ChatMessage], context: Option<&str>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(conversation.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));

        if let Some(context) = context.filter(|c| !c.is_empty()) {
            messages.push(ChatMessage::system(grounding_message(context)));
        }

        messages.extend_from_slice(conversation);
        messages
    }

    /// Complete answer in one call
    pub async fn generate(&self, conversation: &[ChatMessage], context: Option<&str>) -> Result<String> {
        let messages = Self::build_messages(conversation, context);
        self.client
            .chat_completion(messages, &RECOMMENDATION_PARAMS)
            .await
    }

    /// Answer as a stream of non-empty fragments.
    ///
    /// Each call issues a fresh request; dropping the stream early releases
    /// the underlying connection.
    pub async fn generate_stream(
        &self,
        conversation: &[ChatMessage],
        context: Option<&str>,
    ) -> Result<TextStream> {
        let messages = Self::build_messages(conversation, context);
        let stream = self
            .client
            .chat_completion_stream(messages, &RECOMMENDATION_PARAMS)
            .await?;

        Ok(Box::pin(stream.filter(|fragment| {
            futures::future::ready(!matches!(fragment, Ok(text) if text.is_empty()))
        })))
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
