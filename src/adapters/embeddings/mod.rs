//! Embedding model adapters.

pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::RagResult;
use crate::domain::models::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::ports::{EmbeddingModelLoader, EmbeddingProvider};
use crate::infrastructure::vector::HashedEmbeddingProvider;

pub use openai::OpenAiEmbeddingProvider;

/// Dimension used by the hashed model when none is configured.
pub const DEFAULT_HASHED_DIMENSION: usize = 384;

/// Loads the provider selected by an [`EmbeddingConfig`].
#[derive(Debug, Clone)]
pub struct ConfiguredModelLoader {
    config: EmbeddingConfig,
}

impl ConfiguredModelLoader {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EmbeddingModelLoader for ConfiguredModelLoader {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn load(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
        tracing::info!(
            provider = %self.config.provider,
            model = %self.config.model,
            "Loading embedding model"
        );

        match self.config.provider {
            EmbeddingProviderKind::Hashed => {
                let dimension = self.config.dimension.unwrap_or(DEFAULT_HASHED_DIMENSION);
                let provider =
                    HashedEmbeddingProvider::with_model_name(&self.config.model, dimension)?;
                Ok(Arc::new(provider))
            }
            EmbeddingProviderKind::OpenAi => {
                let provider = OpenAiEmbeddingProvider::connect(&self.config).await?;
                Ok(Arc::new(provider))
            }
        }
    }
}
