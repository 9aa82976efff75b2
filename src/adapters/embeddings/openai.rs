//! OpenAI embedding provider adapter.
//!
//! Talks to the `/embeddings` endpoint of the OpenAI API or of any
//! OpenAI-compatible server (Azure OpenAI, vLLM, Ollama, LiteLLM).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::EmbeddingProvider;

/// Text sent once at load time when the dimension is not configured.
const DIMENSION_PROBE: &str = "dimension probe";

/// OpenAI embedding provider.
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider {
    config: EmbeddingConfig,
    dimension: usize,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    /// Build the HTTP client and resolve the vector dimension.
    ///
    /// When `config.dimension` is unset, one probe text is embedded to learn
    /// it, so an unreachable endpoint or a bad key fails here.
    pub async fn connect(config: &EmbeddingConfig) -> RagResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagError::model_unavailable(&config.model, e))?;

        let mut provider = Self {
            config: config.clone(),
            dimension: config.dimension.unwrap_or(0),
            client,
        };

        if provider.dimension == 0 {
            let probe = provider
                .call_embeddings_api(vec![DIMENSION_PROBE.to_string()])
                .await?;
            provider.dimension = probe.first().map_or(0, Vec::len);
            if provider.dimension == 0 {
                return Err(provider.unavailable("model returned an empty embedding"));
            }
            tracing::debug!(
                model = %provider.config.model,
                dimension = provider.dimension,
                "Probed embedding dimension"
            );
        }

        Ok(provider)
    }

    fn unavailable(&self, reason: impl ToString) -> RagError {
        RagError::model_unavailable(&self.config.model, reason)
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> RagResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let expected = texts.len();

        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.unavailable(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(self.unavailable(format!("embedding API returned {status}: {body}")));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| self.unavailable(format!("failed to parse embedding response: {e}")))?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        if data.len() != expected {
            return Err(self.unavailable(format!(
                "expected {expected} embeddings, got {}",
                data.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size.max(1)
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| self.unavailable("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.max_batch_size()) {
            all_vectors.extend(self.call_embeddings_api(batch.to_vec()).await?);
        }

        Ok(all_vectors)
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
