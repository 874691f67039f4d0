//! Configuration management
//!
//! A single [`Config`] is built at startup and its sections are handed to
//! the component constructors. Defaults come from the environment; an
//! optional YAML file overrides them.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Vector index (Chroma) configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// LLM service configuration
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Preference store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Vector index service configuration
///
/// Targets the Chroma 1.x REST API (`/api/v2/tenants/{tenant}/databases/{database}/...`).
/// The `$contains`/`$not_contains` operators on list-valued metadata used by
/// the dish filter need 1.x; the 0.x `/api/v1` routes are not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Host of the Chroma server
    #[serde(default = "default_index_host")]
    pub host: String,

    /// Port of the Chroma server
    #[serde(default = "default_index_port")]
    pub port: u16,

    /// Chroma tenant
    #[serde(default = "default_tenant")]
    pub tenant: String,

    /// Chroma database within the tenant
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding the dish corpus
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Request timeout in seconds
    #[serde(default = "default_index_timeout")]
    pub timeout_secs: u64,
}

impl IndexConfig {
    /// Base URL of the index HTTP API
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Collections endpoint for the configured tenant and database
    pub fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url(),
            self.tenant,
            self.database
        )
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: default_index_host(),
            port: default_index_port(),
            tenant: default_tenant(),
            database: default_database(),
            collection: default_collection(),
            timeout_secs: default_index_timeout(),
        }
    }
}

fn default_index_host() -> String {
    std::env::var("THALI_CHROMA_HOST").unwrap_or_else(|_| "localhost".to_string())
}

fn default_index_port() -> u16 {
    std::env::var("THALI_CHROMA_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000)
}

fn default_tenant() -> String {
    std::env::var("THALI_CHROMA_TENANT").unwrap_or_else(|_| "default_tenant".to_string())
}

fn default_database() -> String {
    std::env::var("THALI_CHROMA_DATABASE").unwrap_or_else(|_| "default_database".to_string())
}

fn default_collection() -> String {
    std::env::var("THALI_CHROMA_COLLECTION").unwrap_or_else(|_| "foods".to_string())
}

fn default_index_timeout() -> u64 {
    10
}

/// LLM service configuration for the OpenAI-compatible generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the LLM service (without the `/v1` suffix)
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key (optional, for authenticated services)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Request timeout in seconds, covering the whole streamed body
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_chat_model(),
            api_key: default_api_key(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("THALI_LLM_URL").unwrap_or_else(|_| "https://api.openai.com".to_string())
}

fn default_chat_model() -> String {
    std::env::var("THALI_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_api_key() -> Option<String> {
    std::env::var("THALI_LLM_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok()
        .filter(|key| !key.is_empty())
}

fn default_llm_timeout() -> u64 {
    120
}

/// Preference store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite preference database
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    std::env::var("THALI_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::DATA_DIR_NAME)
                .join("preferences.sqlite")
        })
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from an explicit path, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
