//! Common test utilities for integration tests
//!
//! Builds in-process pipelines on the hashed embedding model and the
//! in-memory index, so tests need neither network nor model downloads.

use std::sync::Arc;

use newsminds::domain::models::{EmbeddingConfig, Metadata, MetadataValue};
use newsminds::infrastructure::vector::InMemoryBackend;
use newsminds::{Embedder, Retriever, VectorIndex};

/// Dimension of the hashed model used across tests.
pub const TEST_DIMENSION: usize = 256;

/// A retriever over a fresh in-memory collection, plus a handle on its backend.
pub fn memory_retriever() -> (Retriever, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let embedder = Arc::new(Embedder::from_config(&EmbeddingConfig::hashed(
        TEST_DIMENSION,
    )));
    let index = VectorIndex::new(backend.clone(), embedder, "articles");
    (Retriever::new(Arc::new(index)), backend)
}

/// Metadata with a title and a source id.
pub fn article_metadata(title: &str, source_id: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), MetadataValue::from(title));
    metadata.insert("source_id".to_string(), MetadataValue::from(source_id));
    metadata
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
