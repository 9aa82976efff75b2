//! Local feature-hashing embedding model
//!
//! Maps lowercase alphanumeric tokens into a fixed number of buckets with
//! FNV-1a and a sign bit, then L2-normalizes the result. Texts sharing words
//! land close together, which is enough for offline ingestion and tests
//! without a network model.

use async_trait::async_trait;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::ports::EmbeddingProvider;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Texts handed to one `spawn_blocking` call.
const MAX_BATCH_SIZE: usize = 1024;

/// Deterministic bag-of-words embedding provider
#[derive(Debug, Clone)]
pub struct HashedEmbeddingProvider {
    dimension: usize,
    model: String,
}

impl HashedEmbeddingProvider {
    /// Create a provider producing `dimension`-dimensional vectors
    ///
    /// # Returns
    /// * `Ok(Self)` - A new provider
    /// * `Err(_)` - If `dimension` is zero
    pub fn new(dimension: usize) -> RagResult<Self> {
        Self::with_model_name(format!("hashed-bow-{dimension}"), dimension)
    }

    /// Create a provider that reports `model` as its name.
    pub fn with_model_name(model: impl Into<String>, dimension: usize) -> RagResult<Self> {
        let model = model.into();
        if dimension == 0 {
            return Err(RagError::model_unavailable(
                model,
                "embedding dimension must be greater than zero",
            ));
        }

        Ok(Self { dimension, model })
    }

    /// Embed one text synchronously.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            // usize is at least 32 bits on supported targets
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        // f64 accumulation keeps the norm stable for large dimensions
        let magnitude = embedding
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt() as f32;

        if magnitude > 1e-10 {
            for val in &mut embedding {
                *val /= magnitude;
            }
        } else {
            // No tokens (or cancelling buckets): fall back to a uniform unit vector
            let uniform = 1.0 / (self.dimension as f32).sqrt();
            embedding.fill(uniform);
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let provider = self.clone();
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            texts.iter().map(|text| provider.embed_sync(text)).collect()
        })
        .await
        .map_err(|err| RagError::model_unavailable(&self.model, err))
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
