use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "newsminds.yaml";

/// Optional untracked overrides, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".newsminds/local.yaml";

/// Prefix for structured environment overrides (`NEWSMINDS_INDEX__URL`).
pub const ENV_PREFIX: &str = "NEWSMINDS_";

/// Conventional variable names honoured for compatibility with the
/// ingestion scripts, mapped onto config keys.
const PLAIN_ENV_KEYS: [(&str, &str); 4] = [
    ("EMBEDDING_MODEL", "embedding.model"),
    ("OPENAI_API_KEY", "embedding.api_key"),
    ("QDRANT_URL", "index.url"),
    ("QDRANT_API_KEY", "index.api_key"),
];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid chunking: {0}")]
    InvalidChunking(String),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid max_batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    #[error("Invalid retrieval limit: {0}. Must be at least 1")]
    InvalidRetrievalLimit(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Collection name cannot be empty")]
    EmptyCollection,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. newsminds.yaml (project config, optional)
    /// 3. .newsminds/local.yaml (local overrides, optional)
    /// 4. EMBEDDING_MODEL, OPENAI_API_KEY, QDRANT_URL, QDRANT_API_KEY
    /// 5. NEWSMINDS_* environment variables (`__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment([Path::new(CONFIG_FILE), Path::new(LOCAL_CONFIG_FILE)])
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment overrides still apply on top of the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Self::figment([path])
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment<'a>(files: impl IntoIterator<Item = &'a Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for file in files {
            figment = figment.merge(Yaml::file(file));
        }

        for (var, key) in PLAIN_ENV_KEYS {
            figment = figment.merge(Env::raw().only(&[var]).map(move |_| key.into()));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .chunking
            .validate()
            .map_err(|e| ConfigError::InvalidChunking(e.to_string()))?;

        if config.embedding.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "embedding.model cannot be empty".to_string(),
            ));
        }

        if let Some(dimension) = config.embedding.dimension {
            if dimension == 0 {
                return Err(ConfigError::InvalidDimension(dimension));
            }
        }

        if config.embedding.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(
                config.embedding.max_batch_size,
            ));
        }

        if config.index.url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "index.url cannot be empty (use ':memory:' for the in-process index)".to_string(),
            ));
        }

        if config.index.collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }

        if config.retrieval.limit == 0 {
            return Err(ConfigError::InvalidRetrievalLimit(config.retrieval.limit));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
