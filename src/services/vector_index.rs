//! Vector index service
//!
//! Owns one collection on a [`VectorBackend`]: creates it on first write,
//! embeds and upserts chunks, and answers similarity queries.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::adapters::qdrant::QdrantBackend;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Chunk, FieldFilter, IndexConfig, IndexedPoint, SearchHit};
use crate::domain::ports::VectorBackend;
use crate::infrastructure::vector::InMemoryBackend;

use super::embedder::Embedder;

/// A collection of chunk embeddings
pub struct VectorIndex {
    backend: Arc<dyn VectorBackend>,
    embedder: Arc<Embedder>,
    collection: String,
    /// Dimension the collection was verified or created with
    ensured: OnceCell<usize>,
}

impl VectorIndex {
    pub fn new(
        backend: Arc<dyn VectorBackend>,
        embedder: Arc<Embedder>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            embedder,
            collection: collection.into(),
            ensured: OnceCell::new(),
        }
    }

    /// Build the backend named by `config.url` (`:memory:` or a Qdrant URL).
    pub fn from_config(config: &IndexConfig, embedder: Arc<Embedder>) -> RagResult<Self> {
        let backend: Arc<dyn VectorBackend> = if config.is_in_memory() {
            Arc::new(InMemoryBackend::new())
        } else {
            Arc::new(QdrantBackend::new(config)?)
        };

        tracing::debug!(
            backend = backend.name(),
            collection = %config.collection,
            "Vector index configured"
        );

        Ok(Self::new(backend, embedder, config.collection.clone()))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn embedder(&self) -> &Arc<Embedder> {
        &self.embedder
    }

    pub fn backend(&self) -> &Arc<dyn VectorBackend> {
        &self.backend
    }

    /// Create the collection if absent, with the embedder's dimension.
    ///
    /// Concurrent callers in one process share a single attempt. A create
    /// that loses a race with another process is accepted once the existing
    /// collection is confirmed to have the right dimension.
    ///
    /// # Errors
    /// * `DimensionMismatch` - The collection exists with another vector size
    /// * `ModelUnavailable` / `IndexUnavailable` - Dependencies failed; the
    ///   next call tries again
    pub async fn ensure_collection(&self) -> RagResult<()> {
        self.ensured
            .get_or_try_init(|| async {
                let dimension = self.embedder.dimension().await?;

                if let Some(info) = self.backend.collection_info(&self.collection).await? {
                    self.check_dimension(info.dimension, dimension)?;
                    return Ok(dimension);
                }

                if !self
                    .backend
                    .create_collection(&self.collection, dimension)
                    .await?
                {
                    let info = self
                        .backend
                        .collection_info(&self.collection)
                        .await?
                        .ok_or_else(|| {
                            RagError::IndexUnavailable(format!(
                                "collection '{}' reported as existing but not found",
                                self.collection
                            ))
                        })?;
                    self.check_dimension(info.dimension, dimension)?;
                }

                tracing::info!(
                    collection = %self.collection,
                    dimension,
                    backend = self.backend.name(),
                    "Collection ready"
                );
                Ok(dimension)
            })
            .await
            .map(|_| ())
    }

    /// Whether the collection exists with the embedder's dimension.
    ///
    /// A confirmed collection is cached in the same cell `ensure_collection`
    /// fills, so only the first search per index pays for the lookup. An
    /// absent collection is not cached; a later write may create it.
    async fn verify_for_search(&self) -> RagResult<bool> {
        if self.ensured.initialized() {
            return Ok(true);
        }

        let Some(info) = self.backend.collection_info(&self.collection).await? else {
            return Ok(false);
        };
        let dimension = self.embedder.dimension().await?;
        self.check_dimension(info.dimension, dimension)?;

        // a concurrent ensure_collection may have filled the cell first
        let _ = self.ensured.set(dimension);
        Ok(true)
    }

    fn check_dimension(&self, actual: usize, expected: usize) -> RagResult<()> {
        if actual == expected {
            return Ok(());
        }

        Err(RagError::DimensionMismatch {
            collection: self.collection.clone(),
            expected,
            actual,
        })
    }

    /// Embed and store `chunks`, returning their new point ids in input order.
    ///
    /// All points go out in one upsert; on error nothing is reported as written.
    pub async fn add_chunks(&self, chunks: &[Chunk]) -> RagResult<Vec<String>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        self.ensure_collection().await?;

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_many(&texts).await?;

        let points: Vec<IndexedPoint> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexedPoint::from_chunk(chunk, vector))
            .collect();
        let ids: Vec<String> = points.iter().map(|point| point.id.clone()).collect();

        self.backend.upsert_points(&self.collection, points).await?;

        tracing::debug!(collection = %self.collection, count = ids.len(), "Indexed chunks");
        Ok(ids)
    }

    /// Most similar chunks to `query`, best first.
    ///
    /// Scores are raw cosine similarities. A collection that does not exist
    /// yet yields no hits; one built for another model is a
    /// `DimensionMismatch`.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&FieldFilter>,
    ) -> RagResult<Vec<SearchHit>> {
        if limit == 0 {
            return Err(RagError::invalid_input("search limit must be at least 1"));
        }

        if !self.verify_for_search().await? {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_one(query).await?;
        let points = self
            .backend
            .query_points(&self.collection, &vector, limit, filter)
            .await?;

        Ok(points.into_iter().map(SearchHit::from).collect())
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("backend", &self.backend.name())
            .field("collection", &self.collection)
            .field("embedder", &self.embedder)
            .finish()
    }
}
