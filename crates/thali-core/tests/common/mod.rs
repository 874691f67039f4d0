//! Stub collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thali_core::{
    ChatMessage, GenerationParams, GetResponse, Include, LLMClient, Metadata, QueryRequest,
    QueryResponse, Result, TextStream, ThaliError, VectorIndex,
};

/// A dish document in the stub corpus
pub struct StubDish {
    pub id: &'static str,
    pub content: &'static str,
    pub metadata: Metadata,
    pub distance: f64,
}

pub fn dish(
    id: &'static str,
    content: &'static str,
    distance: f64,
    metadata: serde_json::Value,
) -> StubDish {
    StubDish {
        id,
        content,
        metadata: serde_json::from_value(metadata).unwrap(),
        distance,
    }
}

/// In-memory index: applies the filter and returns dishes in corpus order
pub struct StubIndex {
    pub dishes: Vec<StubDish>,
    pub fail: AtomicBool,
    pub last_request: Mutex<Option<QueryRequest>>,
}

impl StubIndex {
    pub fn new(dishes: Vec<StubDish>) -> Self {
        Self {
            dishes,
            fail: AtomicBool::new(false),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        let index = Self::new(Vec::new());
        index.fail.store(true, Ordering::SeqCst);
        index
    }

    pub fn last_request(&self) -> QueryRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.fail.load(Ordering::SeqCst) {
            return Err(ThaliError::Index("connection refused".to_string()));
        }

        let hits: Vec<&StubDish> = self
            .dishes
            .iter()
            .filter(|d| request.filter.as_ref().map_or(true, |f| f.matches(&d.metadata)))
            .take(request.n_results)
            .collect();

        Ok(serde_json::from_value(json!({
            "ids": [hits.iter().map(|d| d.id).collect::<Vec<_>>()],
            "documents": [hits.iter().map(|d| d.content).collect::<Vec<_>>()],
            "metadatas": [hits.iter().map(|d| &d.metadata).collect::<Vec<_>>()],
            "distances": [hits.iter().map(|d| d.distance).collect::<Vec<_>>()],
        }))
        .unwrap())
    }

    async fn get(&self, ids: &[String], _include: &[Include]) -> Result<GetResponse> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ThaliError::Index("connection refused".to_string()));
        }

        let hits: Vec<&StubDish> = self
            .dishes
            .iter()
            .filter(|d| ids.iter().any(|id| id == d.id))
            .collect();

        Ok(GetResponse {
            ids: hits.iter().map(|d| d.id.to_string()).collect(),
            documents: Some(hits.iter().map(|d| Some(d.content.to_string())).collect()),
            metadatas: Some(hits.iter().map(|d| Some(d.metadata.clone())).collect()),
        })
    }

    fn collection_name(&self) -> &str {
        "stub-foods"
    }
}

/// Sets a flag when the stream holding it is dropped
struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Deterministic generation service replaying fixed fragments
pub struct ScriptedLLM {
    pub fragments: Vec<String>,
    pub fail_with: Option<String>,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
    pub seen_params: Mutex<Vec<GenerationParams>>,
    pub released: Arc<AtomicBool>,
    pub stream_calls: AtomicUsize,
}

impl ScriptedLLM {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            fail_with: None,
            seen: Mutex::new(Vec::new()),
            seen_params: Mutex::new(Vec::new()),
            released: Arc::new(AtomicBool::new(false)),
            stream_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        let mut llm = Self::new(&[]);
        llm.fail_with = Some(message.to_string());
        llm
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    fn record(&self, messages: Vec<ChatMessage>, params: &GenerationParams) -> Result<()> {
        self.seen.lock().unwrap().push(messages);
        self.seen_params.lock().unwrap().push(*params);
        match self.fail_with {
            Some(ref message) => Err(ThaliError::ExternalError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LLMClient for ScriptedLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<String> {
        self.record(messages, params)?;
        Ok(self.fragments.concat())
    }

    async fn chat_completion_stream(
        &self,
        messages: Vec<ChatMessage>,
        params: &GenerationParams,
    ) -> Result<TextStream> {
        self.record(messages, params)?;
        self.stream_calls.fetch_add(1, Ordering::SeqCst);

        let guard = ReleaseGuard(self.released.clone());
        let fragments = self.fragments.clone();
        Ok(Box::pin(async_stream::stream! {
            let _guard = guard;
            for fragment in fragments {
                yield Ok::<String, ThaliError>(fragment);
            }
        }))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
