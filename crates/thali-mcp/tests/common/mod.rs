//! In-memory index shared by the MCP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thali_core::{
    Database, GetResponse, Include, Metadata, QueryRequest, QueryResponse, Result, Retriever,
    ThaliError, VectorIndex,
};
use thali_mcp::SharedDatabase;
use tokio::sync::Notify;

pub struct MemoryIndex {
    pub dishes: Vec<(String, String, f64, Metadata)>,
    pub down: AtomicBool,
}

impl MemoryIndex {
    pub fn new(dishes: Vec<(&str, &str, f64, Value)>) -> Self {
        Self {
            dishes: dishes
                .into_iter()
                .map(|(id, content, distance, meta)| {
                    (
                        id.to_string(),
                        content.to_string(),
                        distance,
                        serde_json::from_value(meta).unwrap(),
                    )
                })
                .collect(),
            down: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ThaliError::Index("unreachable".to_string()));
        }
        let hits: Vec<_> = self
            .dishes
            .iter()
            .filter(|(_, _, _, meta)| request.filter.as_ref().map_or(true, |f| f.matches(meta)))
            .take(request.n_results)
            .collect();

        Ok(serde_json::from_value(json!({
            "ids": [hits.iter().map(|d| &d.0).collect::<Vec<_>>()],
            "documents": [hits.iter().map(|d| &d.1).collect::<Vec<_>>()],
            "distances": [hits.iter().map(|d| d.2).collect::<Vec<_>>()],
            "metadatas": [hits.iter().map(|d| &d.3).collect::<Vec<_>>()],
        }))
        .unwrap())
    }

    async fn get(&self, ids: &[String], _include: &[Include]) -> Result<GetResponse> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ThaliError::Index("unreachable".to_string()));
        }
        let hits: Vec<_> = self.dishes.iter().filter(|d| ids.contains(&d.0)).collect();
        Ok(GetResponse {
            ids: hits.iter().map(|d| d.0.clone()).collect(),
            documents: Some(hits.iter().map(|d| Some(d.1.clone())).collect()),
            metadatas: Some(hits.iter().map(|d| Some(d.3.clone())).collect()),
        })
    }

    fn collection_name(&self) -> &str {
        "memory-foods"
    }
}

pub fn sample_index() -> MemoryIndex {
    MemoryIndex::new(vec![
        (
            "chana-masala",
            "Chickpeas simmered in a spiced tomato gravy",
            0.1,
            json!({"name": "Chana Masala", "allergens": [], "meal_type": "lunch", "spice_level": "medium"}),
        ),
        (
            "kaju-katli",
            "Cashew fudge with silver leaf",
            0.4,
            json!({"name": "Kaju Katli", "allergens": ["cashew", "dairy"], "meal_type": "dessert", "spice_level": "mild"}),
        ),
    ])
}

pub fn sample_retriever() -> Retriever {
    Retriever::new(Arc::new(sample_index()))
}

pub fn memory_db() -> SharedDatabase {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    Arc::new(Mutex::new(db))
}

/// Index whose queries wait until the test opens the gate
pub struct GatedIndex {
    pub inner: MemoryIndex,
    pub gate: Arc<Notify>,
}

#[async_trait]
impl VectorIndex for GatedIndex {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.gate.notified().await;
        self.inner.query(request).await
    }

    async fn get(&self, ids: &[String], include: &[Include]) -> Result<GetResponse> {
        self.inner.get(ids, include).await
    }

    fn collection_name(&self) -> &str {
        "gated-foods"
    }
}
