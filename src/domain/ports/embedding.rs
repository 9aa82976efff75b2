//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::RagResult;

/// Trait for loaded embedding models.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "hashed").
    fn name(&self) -> &'static str;

    /// Model identifier served by this provider.
    fn model(&self) -> &str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Maximum number of texts per single call.
    fn max_batch_size(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    ///
    /// Callers split batches at `max_batch_size`; implementations may assume
    /// `texts.len() <= max_batch_size()`.
    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>>;
}

/// Resolves an [`EmbeddingProvider`] on first use.
///
/// A failed load must return `ModelUnavailable`; the caller does not cache
/// failures and will call `load` again.
#[async_trait]
pub trait EmbeddingModelLoader: Send + Sync {
    /// Identifier of the model this loader resolves, for error messages.
    fn model_name(&self) -> &str;

    /// Load (download, connect or probe) the model.
    async fn load(&self) -> RagResult<Arc<dyn EmbeddingProvider>>;
}

/// Loader that hands out an already constructed provider.
pub struct PreloadedModel(pub Arc<dyn EmbeddingProvider>);

#[async_trait]
impl EmbeddingModelLoader for PreloadedModel {
    fn model_name(&self) -> &str {
        self.0.model()
    }

    async fn load(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
        Ok(Arc::clone(&self.0))
    }
}
