//! Thali Core Library
//!
//! Vegetarian Indian dish recommendations grounded in a vector index.
//!
//! # Features
//! - Dietary constraints compiled into vector-index metadata filters
//! - Fail-soft semantic retrieval with normalized, scored results
//! - Persona-framed, retrieval-grounded generation (buffered or streamed)
//! - SQLite-backed per-user preference storage with partial updates

pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod index;
pub mod llm;
pub mod respond;
pub mod retrieval;

pub use config::{Config, IndexConfig, LLMServiceConfig, StoreConfig};
pub use db::{Database, PreferenceUpdate, UserPreferences};
pub use error::{Error, Result, ThaliError};
pub use filter::{DishConstraints, DishQuery, MealType, Predicate, SpiceLevel, DEFAULT_LIMIT};
pub use index::{ChromaIndex, GetResponse, Include, Metadata, QueryRequest, QueryResponse, VectorIndex};
pub use llm::{ChatMessage, GenerationParams, LLMClient, OpenAIClient, Role, TextStream};
pub use respond::{Recommendation, RecommendRequest, Recommender, Responder};
pub use retrieval::{format_context, DishResult, Retrieval, Retriever};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "thali";

/// Default data directory name
pub const DATA_DIR_NAME: &str = "thali";
