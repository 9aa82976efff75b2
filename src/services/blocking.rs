//! Synchronous facade over [`Retriever`]
//!
//! For worker threads (bulk backfills, scripts) that are not running inside
//! a Tokio runtime. Each facade owns a current-thread runtime; calling it
//! from inside an async context panics, as with any nested `block_on`.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{Config, Document, Metadata, SearchHit};

use super::retriever::Retriever;

#[derive(Debug)]
pub struct BlockingRetriever {
    runtime: Runtime,
    inner: Arc<Retriever>,
}

impl BlockingRetriever {
    pub fn new(inner: Arc<Retriever>) -> RagResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RagError::IndexUnavailable(format!("failed to start runtime: {e}")))?;

        Ok(Self { runtime, inner })
    }

    pub fn from_config(config: &Config) -> RagResult<Self> {
        Self::new(Arc::new(Retriever::from_config(config)?))
    }

    /// The shared async retriever.
    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.inner
    }

    pub fn ingest_document(
        &self,
        text: &str,
        metadata: Option<&Metadata>,
        chunk_size: Option<usize>,
    ) -> RagResult<usize> {
        self.runtime
            .block_on(self.inner.ingest_document(text, metadata, chunk_size))
    }

    pub fn ingest_documents(&self, documents: &[Document]) -> RagResult<Vec<usize>> {
        self.runtime.block_on(self.inner.ingest_documents(documents))
    }

    pub fn retrieve(
        &self,
        query: &str,
        limit: usize,
        source_filter: Option<&str>,
    ) -> RagResult<Vec<SearchHit>> {
        self.runtime
            .block_on(self.inner.retrieve(query, limit, source_filter))
    }

    pub fn get_context(&self, query: &str, limit: usize, max_chars: usize) -> RagResult<String> {
        self.runtime
            .block_on(self.inner.get_context(query, limit, max_chars))
    }
}
