//! Embedder service
//!
//! Turns text into fixed-dimension vectors. The model is resolved lazily on
//! first use and then shared for the lifetime of the service.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::adapters::embeddings::ConfiguredModelLoader;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::{EmbeddingModelLoader, EmbeddingProvider, PreloadedModel};

/// Lazily loaded embedding model
///
/// A failed load is not remembered: the next call tries again.
pub struct Embedder {
    loader: Box<dyn EmbeddingModelLoader>,
    model: OnceCell<Arc<dyn EmbeddingProvider>>,
}

impl Embedder {
    /// Create an embedder that loads its model through `loader`.
    pub fn new(loader: impl EmbeddingModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            model: OnceCell::new(),
        }
    }

    /// Create an embedder for the provider selected by `config`.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(ConfiguredModelLoader::new(config.clone()))
    }

    /// Create an embedder around an already constructed provider.
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::new(PreloadedModel(provider))
    }

    /// Configured model identifier; does not trigger a load.
    pub fn model_name(&self) -> &str {
        self.loader.model_name()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    async fn provider(&self) -> RagResult<&Arc<dyn EmbeddingProvider>> {
        self.model
            .get_or_try_init(|| async {
                let provider = self.loader.load().await.map_err(|err| match err {
                    RagError::ModelUnavailable { .. } => err,
                    other => RagError::model_unavailable(self.loader.model_name(), other),
                })?;
                tracing::info!(
                    provider = provider.name(),
                    model = provider.model(),
                    dimension = provider.dimension(),
                    "Embedding model loaded"
                );
                Ok(provider)
            })
            .await
    }

    /// Vector length produced by the model (loads it if needed).
    pub async fn dimension(&self) -> RagResult<usize> {
        Ok(self.provider().await?.dimension())
    }

    /// Embed one text.
    pub async fn embed_one(&self, text: &str) -> RagResult<Vec<f32>> {
        let provider = self.provider().await?;
        let vector = provider.embed(text).await?;
        check_dimension(provider.as_ref(), &vector)?;
        Ok(vector)
    }

    /// Embed several texts, preserving order.
    ///
    /// Input is split into provider-sized batches. An empty input returns
    /// immediately without loading the model.
    pub async fn embed_many(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let provider = self.provider().await?;
        let batch_size = provider.max_batch_size().max(1);
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size) {
            let embedded = provider.embed_batch(batch).await?;
            if embedded.len() != batch.len() {
                return Err(RagError::model_unavailable(
                    provider.model(),
                    format!("returned {} embeddings for {} texts", embedded.len(), batch.len()),
                ));
            }
            for vector in &embedded {
                check_dimension(provider.as_ref(), vector)?;
            }
            vectors.extend(embedded);
        }

        tracing::debug!(count = vectors.len(), model = provider.model(), "Embedded texts");
        Ok(vectors)
    }
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Embedder")
            .field("model", &self.model_name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

fn check_dimension(provider: &dyn EmbeddingProvider, vector: &[f32]) -> RagResult<()> {
    if vector.len() == provider.dimension() {
        return Ok(());
    }

    Err(RagError::model_unavailable(
        provider.model(),
        format!(
            "produced a {}-dimensional vector, expected {}",
            vector.len(),
            provider.dimension()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vector::HashedEmbeddingProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider recording the size of every batch it receives.
    struct RecordingProvider {
        inner: HashedEmbeddingProvider,
        max_batch: usize,
        batches: std::sync::Mutex<Vec<usize>>,
        wrong_dimension: bool,
    }

    impl RecordingProvider {
        fn new(max_batch: usize) -> Self {
            Self {
                inner: HashedEmbeddingProvider::new(8).unwrap(),
                max_batch,
                batches: std::sync::Mutex::new(Vec::new()),
                wrong_dimension: false,
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn model(&self) -> &str {
            "recording-8"
        }

        fn dimension(&self) -> usize {
            8
        }

        fn max_batch_size(&self) -> usize {
            self.max_batch
        }

        async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
            let mut vector = self.inner.embed_sync(text);
            if self.wrong_dimension {
                vector.pop();
            }
            Ok(vector)
        }

        async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            self.batches.lock().unwrap().push(texts.len());
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    /// Loader failing the first `failures` attempts.
    struct FlakyLoader {
        attempts: Arc<AtomicUsize>,
        failures: usize,
    }

    #[async_trait]
    impl EmbeddingModelLoader for FlakyLoader {
        fn model_name(&self) -> &str {
            "flaky"
        }

        async fn load(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(RagError::InvalidInput("weights not found".to_string()));
            }
            Ok(Arc::new(HashedEmbeddingProvider::new(16)?))
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text number {i}")).collect()
    }

    #[tokio::test]
    async fn test_embed_many_empty_does_not_load() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let embedder = Embedder::new(FlakyLoader {
            attempts: Arc::clone(&attempts),
            failures: 0,
        });

        let vectors = embedder.embed_many(&[]).await.unwrap();

        assert!(vectors.is_empty());
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
        assert!(!embedder.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let embedder = Embedder::new(FlakyLoader {
            attempts: Arc::clone(&attempts),
            failures: 1,
        });

        let err = embedder.embed_one("hello").await.unwrap_err();
        match err {
            RagError::ModelUnavailable { model, reason } => {
                assert_eq!(model, "flaky");
                assert!(reason.contains("weights not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(embedder.embed_one("hello").await.unwrap().len(), 16);
        assert_eq!(embedder.dimension().await.unwrap(), 16);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_embed_many_splits_batches_and_keeps_order() {
        let provider = Arc::new(RecordingProvider::new(2));
        let embedder = Embedder::with_provider(provider.clone());
        let input = texts(5);

        let vectors = embedder.embed_many(&input).await.unwrap();

        assert_eq!(*provider.batches.lock().unwrap(), vec![2, 2, 1]);
        for (text, vector) in input.iter().zip(&vectors) {
            assert_eq!(vector, &embedder.embed_one(text).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_model_unavailable() {
        let mut provider = RecordingProvider::new(4);
        provider.wrong_dimension = true;
        let embedder = Embedder::with_provider(Arc::new(provider));

        assert!(matches!(
            embedder.embed_one("x").await,
            Err(RagError::ModelUnavailable { .. })
        ));
        assert!(matches!(
            embedder.embed_many(&texts(3)).await,
            Err(RagError::ModelUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_config_hashed() {
        let embedder = Embedder::from_config(&EmbeddingConfig::hashed(24));
        assert_eq!(embedder.model_name(), "hashed-bow-24");
        assert_eq!(embedder.dimension().await.unwrap(), 24);
        assert!(embedder.is_loaded());
    }
}
