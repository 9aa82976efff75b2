//! Qdrant REST API wire types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::models::Payload;

/// Envelope around every Qdrant response body.
#[derive(Debug, Deserialize)]
pub struct QdrantResponse<T> {
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct CreateCollectionRequest {
    pub vectors: VectorParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorParams {
    pub size: usize,
    #[serde(default = "cosine")]
    pub distance: String,
}

fn cosine() -> String {
    "Cosine".to_string()
}

impl VectorParams {
    pub fn cosine(size: usize) -> Self {
        Self {
            size,
            distance: cosine(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionInfoResult {
    #[serde(default)]
    pub points_count: Option<u64>,
    pub config: CollectionConfig,
}

#[derive(Debug, Deserialize)]
pub struct CollectionConfig {
    pub params: CollectionParams,
}

#[derive(Debug, Deserialize)]
pub struct CollectionParams {
    pub vectors: VectorsConfig,
}

/// A collection has either one unnamed vector or a map of named vectors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VectorsConfig {
    Single(VectorParams),
    Named(HashMap<String, VectorParams>),
}

impl VectorsConfig {
    /// Dimension of the unnamed vector, or of the only named one.
    pub fn dimension(&self) -> Option<usize> {
        match self {
            Self::Single(params) => Some(params.size),
            Self::Named(named) if named.len() == 1 => named.values().next().map(|p| p.size),
            Self::Named(_) => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertPointsRequest<'a> {
    pub points: Vec<PointStruct<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PointStruct<'a> {
    pub id: &'a str,
    pub vector: &'a [f32],
    pub payload: &'a Payload,
}

#[derive(Debug, Serialize)]
pub struct QueryPointsRequest<'a> {
    pub query: &'a [f32],
    pub limit: usize,
    pub with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

#[derive(Debug, Serialize)]
pub struct Filter {
    pub must: Vec<FieldCondition>,
}

#[derive(Debug, Serialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub match_value: MatchValue,
}

#[derive(Debug, Serialize)]
pub struct MatchValue {
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct QueryResult {
    pub points: Vec<ScoredPointOut>,
}

#[derive(Debug, Deserialize)]
pub struct ScoredPointOut {
    pub id: PointId,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<Payload>,
}

/// Qdrant point ids are UUID strings or unsigned integers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Uuid(String),
    Num(u64),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(id) => f.write_str(id),
            Self::Num(id) => write!(f, "{id}"),
        }
    }
}
