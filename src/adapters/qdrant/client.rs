//! Qdrant HTTP backend.
//!
//! Wraps the Qdrant REST API, providing the collection and point
//! operations the vector index needs. Every transport or server failure
//! maps to [`RagError::IndexUnavailable`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{
    CollectionInfo, FieldFilter, IndexConfig, IndexedPoint, MetadataValue, ScoredPoint,
};
use crate::domain::ports::VectorBackend;

use super::models::{
    CollectionInfoResult, CreateCollectionRequest, FieldCondition, Filter, MatchValue,
    PointStruct, QdrantResponse, QueryPointsRequest, QueryResult, UpsertPointsRequest,
    VectorParams,
};

/// HTTP client for a Qdrant server.
#[derive(Debug, Clone)]
pub struct QdrantBackend {
    /// The underlying HTTP client, carrying the `api-key` header when set.
    http: Client,
    /// Server base URL without a trailing slash.
    base_url: String,
}

impl QdrantBackend {
    /// Create a backend for the server at `config.url`.
    ///
    /// No request is made until the first operation.
    pub fn new(config: &IndexConfig) -> RagResult<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = header::HeaderValue::from_str(api_key)
                .map_err(|e| RagError::IndexUnavailable(format!("invalid Qdrant API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert("api-key", value);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RagError::IndexUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> RagResult<Response> {
        request.send().await.map_err(|e| {
            RagError::IndexUnavailable(format!("Qdrant {operation} request failed: {e}"))
        })
    }

    async fn error_from(operation: &str, response: Response) -> RagError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        RagError::IndexUnavailable(format!("Qdrant {operation} returned {status}: {body}"))
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> RagResult<T> {
        let parsed: QdrantResponse<T> = response.json().await.map_err(|e| {
            RagError::IndexUnavailable(format!("failed to parse Qdrant {operation} response: {e}"))
        })?;
        Ok(parsed.result)
    }
}

fn collection_path(collection: &str) -> String {
    format!("/collections/{collection}")
}

/// Qdrant keyword, integer and bool matches only; floats cannot be matched exactly.
fn to_filter(filter: &FieldFilter) -> RagResult<Filter> {
    if matches!(filter.value, MetadataValue::Float(_)) {
        return Err(RagError::invalid_input(format!(
            "filter on '{}' uses a float value, which Qdrant cannot match exactly",
            filter.key
        )));
    }

    Ok(Filter {
        must: vec![FieldCondition {
            key: filter.key.clone(),
            match_value: MatchValue {
                value: filter.value.to_json(),
            },
        }],
    })
}

#[async_trait]
impl VectorBackend for QdrantBackend {
    fn name(&self) -> &'static str {
        "qdrant"
    }

    async fn collection_info(&self, collection: &str) -> RagResult<Option<CollectionInfo>> {
        let request = self.request(Method::GET, &collection_path(collection));
        let response = self.send("get collection", request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from("get collection", response).await);
        }

        let result: CollectionInfoResult = Self::parse("get collection", response).await?;
        let dimension = result.config.params.vectors.dimension().ok_or_else(|| {
            RagError::IndexUnavailable(format!(
                "collection '{collection}' uses several named vectors"
            ))
        })?;

        Ok(Some(CollectionInfo {
            name: collection.to_string(),
            dimension,
            points_count: result.points_count,
        }))
    }

    async fn create_collection(&self, collection: &str, dimension: usize) -> RagResult<bool> {
        let body = CreateCollectionRequest {
            vectors: VectorParams::cosine(dimension),
        };
        let request = self
            .request(Method::PUT, &collection_path(collection))
            .json(&body);
        let response = self.send("create collection", request).await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!(collection, dimension, "Created Qdrant collection");
            return Ok(true);
        }

        if status == StatusCode::CONFLICT {
            return Ok(false);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("already exists") {
            return Ok(false);
        }

        Err(RagError::IndexUnavailable(format!(
            "Qdrant create collection returned {status}: {body}"
        )))
    }

    async fn upsert_points(&self, collection: &str, points: Vec<IndexedPoint>) -> RagResult<()> {
        if points.is_empty() {
            return Ok(());
        }

        let body = UpsertPointsRequest {
            points: points
                .iter()
                .map(|point| PointStruct {
                    id: &point.id,
                    vector: &point.vector,
                    payload: &point.payload,
                })
                .collect(),
        };

        let request = self
            .request(
                Method::PUT,
                &format!("{}/points?wait=true", collection_path(collection)),
            )
            .json(&body);
        let response = self.send("upsert points", request).await?;

        if !response.status().is_success() {
            return Err(Self::error_from("upsert points", response).await);
        }

        tracing::debug!(collection, count = points.len(), "Upserted points");
        Ok(())
    }

    async fn query_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        filter: Option<&FieldFilter>,
    ) -> RagResult<Vec<ScoredPoint>> {
        let body = QueryPointsRequest {
            query: vector,
            limit,
            with_payload: true,
            filter: filter.map(to_filter).transpose()?,
        };

        let request = self
            .request(
                Method::POST,
                &format!("{}/points/query", collection_path(collection)),
            )
            .json(&body);
        let response = self.send("query points", request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(Self::error_from("query points", response).await);
        }

        let result: QueryResult = Self::parse("query points", response).await?;
        Ok(result
            .points
            .into_iter()
            .map(|point| ScoredPoint {
                id: point.id.to_string(),
                score: point.score,
                payload: point.payload.unwrap_or_default(),
            })
            .collect())
    }
}
