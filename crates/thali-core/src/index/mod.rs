//! Vector index boundary
//!
//! The index embeds and ranks documents itself; this crate only sends query
//! text plus a metadata filter and reads back Chroma-shaped parallel arrays.

mod chroma;

pub use chroma::ChromaIndex;

use crate::error::Result;
use crate::filter::Predicate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar metadata attached to a dish document
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Fields requested alongside ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Include {
    Documents,
    Metadatas,
    Distances,
}

/// Nearest-neighbour query
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub text: String,
    pub filter: Option<Predicate>,
    pub n_results: usize,
    pub include: Vec<Include>,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>, filter: Option<Predicate>, n_results: usize) -> Self {
        Self {
            text: text.into(),
            filter,
            n_results,
            include: vec![Include::Documents, Include::Metadatas, Include::Distances],
        }
    }
}

/// Query response: one row per query text, ranked nearest-first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Vec<Option<Metadata>>>>,
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

/// Point lookup response, flat parallel arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub documents: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Option<Metadata>>>,
}

/// Semantic document index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Rank documents against query text, honouring the filter
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;

    /// Fetch documents by id
    async fn get(&self, ids: &[String], include: &[Include]) -> Result<GetResponse>;

    /// Collection name, for logging
    fn collection_name(&self) -> &str;
}
