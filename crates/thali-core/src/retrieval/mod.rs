//! Retrieval engine
//!
//! Runs filtered semantic queries against a [`VectorIndex`] and normalizes
//! its parallel arrays into [`DishResult`]s. Index failures never escape:
//! they come back as [`Retrieval::Degraded`] and collapse to an empty result.

mod context;

pub use context::format_context;

use crate::error::ThaliError;
use crate::filter::DishQuery;
use crate::index::{GetResponse, Include, Metadata, QueryRequest, QueryResponse, VectorIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A dish returned from the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishResult {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// `1 - distance`; absent for point lookups, which carry no distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl DishResult {
    /// Metadata value rendered as text, if present and scalar or list
    pub fn meta_str(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Array(items) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

/// Outcome of a fail-soft index call
#[derive(Debug)]
pub enum Retrieval<T> {
    /// The index answered
    Fresh(T),
    /// The index failed; callers get the empty fallback
    Degraded(ThaliError),
}

impl<T: Default> Retrieval<T> {
    /// The data, or the empty fallback when degraded
    pub fn into_inner(self) -> T {
        match self {
            Self::Fresh(value) => value,
            Self::Degraded(_) => T::default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// Filtered semantic search over the dish corpus
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Search, reporting whether the index answered
    pub async fn search_outcome(&self, query: &DishQuery) -> Retrieval<Vec<DishResult>> {
        let filter = query.constraints.compile();
        let request = QueryRequest::new(query.text.as_str(), filter, query.limit);

        match self.index.query(&request).await {
            Ok(response) => {
                let results = normalize_query_response(response);
                tracing::debug!(
                    "Retrieved {} dishes from '{}' for {:?}",
                    results.len(),
                    self.index.collection_name(),
                    query.text
                );
                Retrieval::Fresh(results)
            }
            Err(e) => {
                tracing::warn!("Dish search degraded to no results: {}", e);
                Retrieval::Degraded(e)
            }
        }
    }

    /// Search; index failures yield an empty list
    pub async fn search(&self, query: &DishQuery) -> Vec<DishResult> {
        self.search_outcome(query).await.into_inner()
    }

    /// Point lookup, reporting whether the index answered
    pub async fn get_by_id_outcome(&self, id: &str) -> Retrieval<Option<DishResult>> {
        let ids = [id.to_string()];
        match self
            .index
            .get(&ids, &[Include::Documents, Include::Metadatas])
            .await
        {
            Ok(response) => Retrieval::Fresh(normalize_get_response(id, response)),
            Err(e) => {
                tracing::warn!("Dish lookup for '{}' degraded to not found: {}", id, e);
                Retrieval::Degraded(e)
            }
        }
    }

    /// Point lookup; index failures yield `None`
    pub async fn get_by_id(&self, id: &str) -> Option<DishResult> {
        self.get_by_id_outcome(id).await.into_inner()
    }
}

/// Flatten the first query row into results, keeping the index's order.
///
/// Iteration follows the documents array; a missing distance gives score 0.
pub fn normalize_query_response(response: QueryResponse) -> Vec<DishResult> {
    let QueryResponse {
        ids,
        documents,
        metadatas,
        distances,
    } = response;

    let Some(documents) = documents.and_then(|rows| rows.into_iter().next()) else {
        return Vec::new();
    };
    let ids = ids.into_iter().next().unwrap_or_default();
    let mut metadatas = metadatas
        .and_then(|rows| rows.into_iter().next())
        .unwrap_or_default()
        .into_iter();
    let distances = distances.and_then(|rows| rows.into_iter().next());

    documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| {
            let score = match distances {
                Some(ref row) => row.get(i).copied().flatten().map(|d| 1.0 - d).unwrap_or(0.0),
                None => 0.0,
            };
            DishResult {
                id: ids.get(i).cloned().unwrap_or_default(),
                content: document.unwrap_or_default(),
                metadata: metadatas.next().flatten().unwrap_or_default(),
                score: Some(score),
            }
        })
        .collect()
}

/// First document of a point lookup, or `None` when nothing came back
pub fn normalize_get_response(id: &str, response: GetResponse) -> Option<DishResult> {
    let document = response.documents?.into_iter().next()?;
    let metadata = response
        .metadatas
        .and_then(|m| m.into_iter().next())
        .flatten()
        .unwrap_or_default();

    Some(DishResult {
        id: id.to_string(),
        content: document.unwrap_or_default(),
        metadata,
        score: None,
    })
}
