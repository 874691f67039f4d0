//! Retrieval-grounded conversational recommendations

use super::Responder;
use crate::error::Result;
use crate::filter::{DishConstraints, DishQuery, DEFAULT_LIMIT};
use crate::llm::{ChatMessage, Role, TextStream};
use crate::retrieval::{format_context, DishResult, Retriever};
use serde::{Deserialize, Serialize};

/// One conversational turn from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// Conversation so far; the last user message is the search query
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub constraints: DishConstraints,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl RecommendRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            constraints: DishConstraints::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_constraints(mut self, constraints: DishConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Text of the most recent user message, empty if there is none
    pub fn query_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    fn dish_query(&self) -> DishQuery {
        DishQuery::new(self.query_text())
            .with_constraints(self.constraints.clone())
            .with_limit(self.limit)
    }
}

/// A buffered answer together with the dishes that grounded it
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub answer: String,
    pub dishes: Vec<DishResult>,
}

/// Retrieval followed by generation
#[derive(Clone)]
pub struct Recommender {
    retriever: Retriever,
    responder: Responder,
}

impl Recommender {
    pub fn new(retriever: Retriever, responder: Responder) -> Self {
        Self {
            retriever,
            responder,
        }
    }

    /// Dishes grounding this request; empty when the index is unavailable
    pub async fn ground(&self, request: &RecommendRequest) -> Vec<DishResult> {
        self.retriever.search(&request.dish_query()).await
    }

    /// Retrieve, then generate a complete answer
    pub async fn answer(&self, request: &RecommendRequest) -> Result<Recommendation> {
        let dishes = self.ground(request).await;
        let context = format_context(&dishes);

        let answer = self
            .responder
            .generate(&request.messages, context.as_deref())
            .await?;

        Ok(Recommendation { answer, dishes })
    }

    /// Retrieve, then stream the answer
    pub async fn answer_stream(
        &self,
        request: &RecommendRequest,
    ) -> Result<(Vec<DishResult>, TextStream)> {
        let dishes = self.ground(request).await;
        let context = format_context(&dishes);

        let stream = self
            .responder
            .generate_stream(&request.messages, context.as_deref())
            .await?;

        Ok((dishes, stream))
    }
}
