use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::chunking::ChunkingConfig;

/// Location value selecting the in-process vector index instead of Qdrant.
pub const MEMORY_LOCATION: &str = ":memory:";

/// Number of chunks retrieved when no limit is given.
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 5;

/// Context budget in characters, roughly 3000 tokens at ~4 characters per token.
pub const DEFAULT_CONTEXT_CHARS: usize = 12_000;

const REDACTED: &str = "***";

/// Main configuration structure for the retrieval pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// Chunking defaults used by ingestion
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval and context assembly defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Copy of this configuration with API keys masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.embedding.api_key.is_some() {
            copy.embedding.api_key = Some(REDACTED.to_string());
        }
        if copy.index.api_key.is_some() {
            copy.index.api_key = Some(REDACTED.to_string());
        }
        copy
    }
}

/// Which embedding backend to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Any OpenAI-compatible `/embeddings` endpoint
    #[serde(rename = "openai")]
    OpenAi,

    /// Deterministic local feature-hashing model (no network)
    Hashed,
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("openai"),
            Self::Hashed => f.write_str("hashed"),
        }
    }
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Backend used to produce vectors
    #[serde(default = "default_provider")]
    pub provider: EmbeddingProviderKind,

    /// Model identifier (`EMBEDDING_MODEL`)
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the embeddings API
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// API key for the embeddings API (`OPENAI_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Vector dimension; probed from the model on first load when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum texts per embedding request
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

const fn default_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::OpenAi
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_batch_size() -> usize {
    256
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_embedding_base_url(),
            api_key: None,
            dimension: None,
            timeout_secs: default_timeout_secs(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

impl EmbeddingConfig {
    /// Configuration for the local hashed model with the given dimension.
    pub fn hashed(dimension: usize) -> Self {
        Self {
            provider: EmbeddingProviderKind::Hashed,
            model: format!("hashed-bow-{dimension}"),
            dimension: Some(dimension),
            ..Self::default()
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexConfig {
    /// Qdrant base URL (`QDRANT_URL`), or `:memory:` for the in-process index
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Qdrant API key (`QDRANT_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Collection holding article chunks
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_index_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "articles".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            api_key: None,
            collection: default_collection(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl IndexConfig {
    /// In-process index configuration for the given collection.
    pub fn in_memory(collection: impl Into<String>) -> Self {
        Self {
            url: MEMORY_LOCATION.to_string(),
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Whether the in-process index was requested.
    pub fn is_in_memory(&self) -> bool {
        self.url == MEMORY_LOCATION
    }
}

/// Retrieval defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Number of chunks returned by default
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Character budget for assembled context
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

const fn default_limit() -> usize {
    DEFAULT_RETRIEVAL_LIMIT
}

const fn default_max_context_chars() -> usize {
    DEFAULT_CONTEXT_CHARS
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Rotation policy for file output
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
