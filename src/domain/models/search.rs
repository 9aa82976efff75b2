//! Indexed points, search filters and ranked hits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chunking::{Chunk, Metadata, MetadataValue};

/// Payload field holding the chunk text.
pub const TEXT_FIELD: &str = "text";

/// Payload field used for provenance tags in assembled context.
pub const TITLE_FIELD: &str = "title";

/// Payload field identifying the originating source.
pub const SOURCE_ID_FIELD: &str = "source_id";

/// JSON object stored alongside each vector.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Exact-match restriction on a payload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub key: String,
    pub value: MetadataValue,
}

impl FieldFilter {
    pub fn new(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Restrict results to one originating source.
    pub fn source_id(source_id: impl Into<String>) -> Self {
        Self::new(SOURCE_ID_FIELD, MetadataValue::String(source_id.into()))
    }

    /// Whether `payload` carries exactly this value under `key`.
    pub fn matches(&self, payload: &Payload) -> bool {
        payload
            .get(&self.key)
            .and_then(MetadataValue::from_json)
            .is_some_and(|value| value == self.value)
    }
}

/// A vector plus payload, ready to be written to a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    /// Random v4 UUID, never derived from content
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

impl IndexedPoint {
    /// Build a point for `chunk` with a freshly generated id.
    ///
    /// The payload is the chunk metadata plus `text`; the chunk text wins if
    /// the metadata also carries a `text` key.
    pub fn from_chunk(chunk: &Chunk, vector: Vec<f32>) -> Self {
        let mut payload: Payload = chunk
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        payload.insert(
            TEXT_FIELD.to_string(),
            serde_json::Value::String(chunk.text.clone()),
        );

        Self {
            id: Uuid::new_v4().to_string(),
            vector,
            payload,
        }
    }
}

/// Raw nearest-neighbour result as returned by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: String,
    /// Cosine similarity, -1..1
    pub score: f32,
    pub payload: Payload,
}

/// Vector dimension and size of an existing collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub dimension: usize,
    pub points_count: Option<u64>,
}

/// A ranked retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,

    /// Raw cosine similarity from the index, not re-normalised
    pub score: f32,

    pub text: String,

    /// Stored payload minus `text`; non-scalar payload fields are dropped
    pub metadata: Metadata,
}

impl SearchHit {
    /// The `title` metadata field, if present and a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get(TITLE_FIELD).and_then(MetadataValue::as_str)
    }
}

impl From<ScoredPoint> for SearchHit {
    fn from(point: ScoredPoint) -> Self {
        let mut payload = point.payload;
        let text = match payload.remove(TEXT_FIELD) {
            Some(serde_json::Value::String(text)) => text,
            _ => String::new(),
        };
        let metadata = payload
            .iter()
            .filter_map(|(key, value)| {
                MetadataValue::from_json(value).map(|scalar| (key.clone(), scalar))
            })
            .collect();

        Self {
            id: point.id,
            score: point.score,
            text,
            metadata,
        }
    }
}
