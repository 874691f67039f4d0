//! HTTP client for a Chroma 1.x server (v2 REST API)

use super::{GetResponse, Include, QueryRequest, QueryResponse, VectorIndex};
use crate::config::IndexConfig;
use crate::error::{Result, ThaliError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Chroma collection accessed over its REST API
pub struct ChromaIndex {
    http_client: reqwest::Client,
    config: IndexConfig,
    collections_url: String,
    collection_id: OnceCell<String>,
}

impl ChromaIndex {
    /// Create a client from configuration. No request is made until first use.
    pub fn new(config: IndexConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ThaliError::Http)?;

        let collections_url = config.collections_url();

        Ok(Self {
            http_client,
            config,
            collections_url,
            collection_id: OnceCell::new(),
        })
    }

    /// Resolve (creating if needed) the collection id, once per client
    async fn collection_id(&self) -> Result<&str> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                #[derive(Deserialize)]
                struct CollectionResponse {
                    id: String,
                }

                let body = json!({
                    "name": self.config.collection,
                    "metadata": { "hnsw:space": "cosine" },
                    "get_or_create": true,
                });

                let response: CollectionResponse =
                    self.post_json(&self.collections_url, &body).await?;

                tracing::debug!(
                    "Resolved collection '{}' to {}",
                    self.config.collection,
                    response.id
                );
                Ok::<_, ThaliError>(response.id)
            })
            .await?;

        Ok(id.as_str())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let response = self.http_client.post(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ThaliError::Index(format!(
                "Chroma request failed (HTTP {}): {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

/// Request body for `/query`
pub(crate) fn build_query_body(request: &QueryRequest) -> Value {
    let mut body = json!({
        "query_texts": [request.text],
        "n_results": request.n_results,
        "include": request.include,
    });

    if let Some(ref filter) = request.filter {
        body["where"] = filter.to_where();
    }

    body
}

/// Request body for `/get`
pub(crate) fn build_get_body(ids: &[String], include: &[Include]) -> Value {
    json!({
        "ids": ids,
        "include": include,
    })
}

#[async_trait]
impl VectorIndex for ChromaIndex {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let id = self.collection_id().await?;
        let url = format!("{}/{}/query", self.collections_url, id);
        let body = build_query_body(request);

        tracing::debug!("Chroma query: {}", body);
        self.post_json(&url, &body).await
    }

    async fn get(&self, ids: &[String], include: &[Include]) -> Result<GetResponse> {
        let id = self.collection_id().await?;
        let url = format!("{}/{}/get", self.collections_url, id);
        self.post_json(&url, &build_get_body(ids, include)).await
    }

    fn collection_name(&self) -> &str {
        &self.config.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DishConstraints, Predicate};

    #[test]
    fn test_query_body_without_filter() {
        let request = QueryRequest::new("paneer", None, 5);
        let body = build_query_body(&request);

        assert_eq!(body["query_texts"], json!(["paneer"]));
        assert_eq!(body["n_results"], json!(5));
        assert_eq!(
            body["include"],
            json!(["documents", "metadatas", "distances"])
        );
        assert!(body.get("where").is_none());
    }

    #[test]
    fn test_query_body_with_filter() {
        let filter = DishConstraints::new().spice_level("mild").compile();
        let request = QueryRequest::new("", filter, 0);
        let body = build_query_body(&request);

        assert_eq!(body["where"], json!({"spice_level": "mild"}));
        // Empty text and zero limit are forwarded untouched
        assert_eq!(body["query_texts"], json!([""]));
        assert_eq!(body["n_results"], json!(0));
    }

    #[test]
    fn test_get_body() {
        let body = build_get_body(
            &["dish-42".to_string()],
            &[Include::Documents, Include::Metadatas],
        );
        assert_eq!(
            body,
            json!({"ids": ["dish-42"], "include": ["documents", "metadatas"]})
        );
    }

    #[test]
    fn test_query_response_with_null_distances() {
        let raw = json!({
            "ids": [["a", "b"]],
            "documents": [["Idli", "Vada"]],
            "metadatas": [[{"cuisine": "south_indian"}, null]],
            "distances": null
        });
        let response: QueryResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.ids[0].len(), 2);
        assert!(response.distances.is_none());
        assert!(response.metadatas.unwrap()[0][1].is_none());
    }

    #[test]
    fn test_not_contains_renders_for_chroma() {
        let p = Predicate::not_contains("allergens", "cashew");
        let request = QueryRequest::new("korma", Some(p), 3);
        assert_eq!(
            build_query_body(&request)["where"],
            json!({"allergens": {"$not_contains": "cashew"}})
        );
    }
}
