//! In-process vector backend
//!
//! Keeps collections in memory and ranks points by brute-force cosine
//! similarity. Selected with the `:memory:` index location; used for tests,
//! demos and small offline corpora.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{CollectionInfo, FieldFilter, IndexedPoint, ScoredPoint};
use crate::domain::ports::VectorBackend;

#[derive(Debug)]
struct StoredCollection {
    dimension: usize,
    points: Vec<IndexedPoint>,
    /// Point id to its position in `points`
    positions: HashMap<String, usize>,
}

impl StoredCollection {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn upsert(&mut self, point: IndexedPoint) {
        match self.positions.get(&point.id) {
            Some(&position) => self.points[position] = point,
            None => {
                self.positions.insert(point.id.clone(), self.points.len());
                self.points.push(point);
            }
        }
    }
}

/// Cosine-similarity index held in process memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, StoredCollection>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points stored in `collection` (0 if it does not exist).
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |stored| stored.points.len())
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 for mismatched lengths or a zero-magnitude operand.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

#[async_trait]
impl VectorBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn collection_info(&self, collection: &str) -> RagResult<Option<CollectionInfo>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(|stored| CollectionInfo {
            name: collection.to_string(),
            dimension: stored.dimension,
            points_count: Some(stored.points.len() as u64),
        }))
    }

    async fn create_collection(&self, collection: &str, dimension: usize) -> RagResult<bool> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(collection) {
            return Ok(false);
        }

        collections.insert(collection.to_string(), StoredCollection::new(dimension));
        Ok(true)
    }

    async fn upsert_points(&self, collection: &str, points: Vec<IndexedPoint>) -> RagResult<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.get_mut(collection).ok_or_else(|| {
            RagError::IndexUnavailable(format!("collection '{collection}' does not exist"))
        })?;

        // validate the whole batch before touching stored points
        if let Some(bad) = points.iter().find(|p| p.vector.len() != stored.dimension) {
            return Err(RagError::DimensionMismatch {
                collection: collection.to_string(),
                expected: bad.vector.len(),
                actual: stored.dimension,
            });
        }

        stored.points.reserve(points.len());
        for point in points {
            stored.upsert(point);
        }

        Ok(())
    }

    async fn query_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        filter: Option<&FieldFilter>,
    ) -> RagResult<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        if vector.len() != stored.dimension {
            return Err(RagError::DimensionMismatch {
                collection: collection.to_string(),
                expected: vector.len(),
                actual: stored.dimension,
            });
        }

        let mut results: Vec<ScoredPoint> = stored
            .points
            .iter()
            .filter(|point| filter.is_none_or(|f| f.matches(&point.payload)))
            .map(|point| ScoredPoint {
                id: point.id.clone(),
                score: cosine_similarity(vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();

        // stable sort keeps insertion order among equal scores
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Payload;
    use serde_json::json;

    fn point(id: &str, vector: Vec<f32>, payload: serde_json::Value) -> IndexedPoint {
        IndexedPoint {
            id: id.to_string(),
            vector,
            payload: payload.as_object().cloned().unwrap_or_else(Payload::new),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let c = vec![0.0, 1.0, 0.0];
        let d = vec![-1.0, 0.0, 0.0];

        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &c).abs() < 1e-6);
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_create_collection_is_idempotent() {
        let backend = InMemoryBackend::new();

        assert!(backend.collection_info("articles").await.unwrap().is_none());
        assert!(backend.create_collection("articles", 3).await.unwrap());
        assert!(!backend.create_collection("articles", 3).await.unwrap());

        let info = backend.collection_info("articles").await.unwrap().unwrap();
        assert_eq!(info.dimension, 3);
        assert_eq!(info.points_count, Some(0));
    }

    #[tokio::test]
    async fn test_upsert_requires_collection() {
        let backend = InMemoryBackend::new();
        let err = backend
            .upsert_points("missing", vec![point("a", vec![1.0], json!({}))])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::IndexUnavailable(_)));
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension_atomically() {
        let backend = InMemoryBackend::new();
        backend.create_collection("c", 2).await.unwrap();

        let err = backend
            .upsert_points(
                "c",
                vec![point("a", vec![1.0, 0.0], json!({})), point("b", vec![1.0], json!({}))],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RagError::DimensionMismatch { .. }));
        assert_eq!(backend.len("c").await, 0);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_id() {
        let backend = InMemoryBackend::new();
        backend.create_collection("c", 2).await.unwrap();

        backend
            .upsert_points("c", vec![point("a", vec![1.0, 0.0], json!({"v": 1}))])
            .await
            .unwrap();
        backend
            .upsert_points("c", vec![point("a", vec![0.0, 1.0], json!({"v": 2}))])
            .await
            .unwrap();

        assert_eq!(backend.len("c").await, 1);
        let hits = backend.query_points("c", &[0.0, 1.0], 5, None).await.unwrap();
        assert_eq!(hits[0].payload["v"], json!(2));
    }

    #[tokio::test]
    async fn test_upsert_mixed_batch_keeps_insertion_order() {
        let backend = InMemoryBackend::new();
        backend.create_collection("c", 2).await.unwrap();
        backend
            .upsert_points(
                "c",
                vec![
                    point("a", vec![1.0, 0.0], json!({"v": 1})),
                    point("b", vec![1.0, 0.0], json!({"v": 1})),
                ],
            )
            .await
            .unwrap();

        // replaces "b" in place, appends "c" and "d"
        backend
            .upsert_points(
                "c",
                vec![
                    point("c", vec![1.0, 0.0], json!({"v": 1})),
                    point("b", vec![1.0, 0.0], json!({"v": 2})),
                    point("d", vec![1.0, 0.0], json!({"v": 1})),
                ],
            )
            .await
            .unwrap();

        assert_eq!(backend.len("c").await, 4);
        let hits = backend.query_points("c", &[1.0, 0.0], 10, None).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(hits[1].payload["v"], json!(2));
    }

    #[tokio::test]
    async fn test_query_ranks_filters_and_truncates() {
        let backend = InMemoryBackend::new();
        backend.create_collection("c", 2).await.unwrap();
        backend
            .upsert_points(
                "c",
                vec![
                    point("far", vec![0.0, 1.0], json!({"source_id": "A"})),
                    point("near", vec![1.0, 0.1], json!({"source_id": "B"})),
                    point("mid", vec![1.0, 1.0], json!({"source_id": "A"})),
                ],
            )
            .await
            .unwrap();

        let all = backend.query_points("c", &[1.0, 0.0], 10, None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);

        let top = backend.query_points("c", &[1.0, 0.0], 1, None).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, "near");

        let filter = FieldFilter::source_id("A");
        let filtered = backend
            .query_points("c", &[1.0, 0.0], 10, Some(&filter))
            .await
            .unwrap();
        let ids: Vec<_> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mid", "far"]);
    }

    #[tokio::test]
    async fn test_query_missing_collection_is_empty() {
        let backend = InMemoryBackend::new();
        let hits = backend.query_points("nope", &[1.0], 5, None).await.unwrap();
        assert!(hits.is_empty());
    }
}
