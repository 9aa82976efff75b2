use async_trait::async_trait;

use crate::domain::errors::RagResult;
use crate::domain::models::{CollectionInfo, FieldFilter, IndexedPoint, ScoredPoint};

/// Storage interface for vector collections
///
/// Backends store points and rank them by cosine similarity. They know
/// nothing about chunking or embedding; `VectorIndex` layers those on top.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Backend name for logs (e.g., "qdrant", "memory").
    fn name(&self) -> &'static str;

    /// Describe a collection
    ///
    /// # Returns
    /// * `Ok(Some(info))` - The collection exists
    /// * `Ok(None)` - No collection with that name
    /// * `Err(_)` - The backend could not be reached
    async fn collection_info(&self, collection: &str) -> RagResult<Option<CollectionInfo>>;

    /// Create a cosine-distance collection with the given vector dimension
    ///
    /// # Returns
    /// * `Ok(true)` - The collection was created by this call
    /// * `Ok(false)` - It already existed (e.g., another caller won the race)
    /// * `Err(_)` - Creation failed
    async fn create_collection(&self, collection: &str, dimension: usize) -> RagResult<bool>;

    /// Insert or replace points in one request
    ///
    /// Either every point is accepted or an error is returned.
    async fn upsert_points(&self, collection: &str, points: Vec<IndexedPoint>) -> RagResult<()>;

    /// Nearest neighbours of `vector`, best first
    ///
    /// # Arguments
    /// * `collection` - Collection to search; a missing collection yields no results
    /// * `vector` - Query embedding
    /// * `limit` - Maximum number of results
    /// * `filter` - Optional exact match on a payload field
    async fn query_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        filter: Option<&FieldFilter>,
    ) -> RagResult<Vec<ScoredPoint>>;
}
