//! Domain errors for the retrieval pipeline.

use thiserror::Error;

/// Errors surfaced by chunking, embedding, indexing and retrieval.
///
/// Nothing in the pipeline retries internally: every variant reaches the
/// caller, which decides whether to retry or degrade.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding model failed to load or failed to run.
    ///
    /// Fatal for the call in progress only; the next call retries the load.
    #[error("Embedding model '{model}' unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    /// Connectivity or authentication failure talking to the vector database.
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Rejected before any I/O (bad chunk sizes, zero limit, nested metadata).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The collection was created for a different embedding model.
    #[error(
        "Collection '{collection}' stores {actual}-dimensional vectors but the embedding model produces {expected}"
    )]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    /// Caller-supplied JSON (such as `--meta-json`) failed to parse.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    /// Build a [`RagError::ModelUnavailable`] for `model`.
    pub fn model_unavailable(model: impl Into<String>, reason: impl ToString) -> Self {
        Self::ModelUnavailable {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`RagError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Whether a caller may treat this failure as "no results" and carry on.
    ///
    /// The agent layer uses this to degrade retrieval instead of failing a
    /// whole request when the model or the index is down.
    pub const fn is_degradable(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. } | Self::IndexUnavailable(_))
    }
}

impl From<serde_json::Error> for RagError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degradable_variants() {
        assert!(RagError::model_unavailable("m", "boom").is_degradable());
        assert!(RagError::IndexUnavailable("down".to_string()).is_degradable());
        assert!(!RagError::invalid_input("bad").is_degradable());
        assert!(!RagError::DimensionMismatch {
            collection: "articles".to_string(),
            expected: 384,
            actual: 768,
        }
        .is_degradable());
    }

    #[test]
    fn test_display_mentions_model() {
        let err = RagError::model_unavailable("all-MiniLM-L6-v2", "network timeout");
        let msg = err.to_string();
        assert!(msg.contains("all-MiniLM-L6-v2"));
        assert!(msg.contains("network timeout"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: RagError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RagError::Serialization(_)));
    }
}
