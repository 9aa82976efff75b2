//! Retriever service
//!
//! High-level orchestration for document ingestion and semantic retrieval.
//! Coordinates chunking, embedding, vector storage and context assembly.

use std::sync::Arc;

use crate::domain::errors::RagResult;
use crate::domain::models::{
    validate_metadata, ChunkingConfig, Config, Document, FieldFilter, Metadata, SearchHit,
};
use crate::infrastructure::vector::Chunker;

use super::embedder::Embedder;
use super::vector_index::VectorIndex;

/// Separator placed between context entries.
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Source tag used for hits without a `title`.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Ingestion and retrieval over one vector index
///
/// This service provides high-level operations for:
/// - Adding documents with automatic chunking and embedding
/// - Retrieving relevant chunks for a query
/// - Assembling a budgeted context string for a prompt
#[derive(Debug)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    chunking: ChunkingConfig,
}

impl Retriever {
    /// Create a retriever with the default 500/50 chunking.
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self {
            index,
            chunking: ChunkingConfig::default(),
        }
    }

    /// Create a retriever with custom chunking defaults.
    pub fn with_chunking(index: Arc<VectorIndex>, chunking: ChunkingConfig) -> RagResult<Self> {
        chunking.validate()?;
        Ok(Self { index, chunking })
    }

    /// Wire embedder, index and retriever from a loaded configuration.
    ///
    /// Nothing touches the network until the first ingest or query.
    pub fn from_config(config: &Config) -> RagResult<Self> {
        let embedder = Arc::new(Embedder::from_config(&config.embedding));
        let index = Arc::new(VectorIndex::from_config(&config.index, embedder)?);
        Self::with_chunking(index, config.chunking.clone())
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    pub const fn chunking(&self) -> &ChunkingConfig {
        &self.chunking
    }

    /// Chunk, embed and store one document
    ///
    /// # Arguments
    /// * `text` - The document body
    /// * `metadata` - Document metadata copied onto every chunk (e.g., title, source_id)
    /// * `chunk_size` - Characters per chunk; the configured size when `None`
    ///
    /// # Returns
    /// * `Ok(n)` - Number of chunks stored (0 for empty or whitespace-only text)
    /// * `Err(_)` - Invalid chunk size or metadata, or embedding/indexing failed
    pub async fn ingest_document(
        &self,
        text: &str,
        metadata: Option<&Metadata>,
        chunk_size: Option<usize>,
    ) -> RagResult<usize> {
        let config = ChunkingConfig::new(
            chunk_size.unwrap_or(self.chunking.chunk_size),
            self.chunking.chunk_overlap,
        );
        let chunker = Chunker::with_config(config)?;

        let empty = Metadata::new();
        let metadata = metadata.unwrap_or(&empty);
        validate_metadata(metadata)?;

        let chunks = chunker.chunk(text, metadata);
        if chunks.is_empty() {
            return Ok(0);
        }

        let ids = self.index.add_chunks(&chunks).await?;

        tracing::info!(
            chunks = ids.len(),
            collection = %self.index.collection(),
            "Ingested document"
        );

        Ok(ids.len())
    }

    /// Ingest documents one after another, stopping at the first error.
    ///
    /// Returns the chunk count of each document, in input order.
    pub async fn ingest_documents(&self, documents: &[Document]) -> RagResult<Vec<usize>> {
        let mut counts = Vec::with_capacity(documents.len());

        for document in documents {
            counts.push(
                self.ingest_document(&document.text, Some(&document.metadata), None)
                    .await?,
            );
        }

        Ok(counts)
    }

    /// Retrieve relevant chunks for a query
    ///
    /// # Arguments
    /// * `query` - The search query
    /// * `limit` - Maximum number of results (at least 1)
    /// * `source_filter` - Only return chunks whose `source_id` equals this value
    ///
    /// # Returns
    /// * `Ok(Vec<SearchHit>)` - Ordered by relevance (most relevant first)
    /// * `Err(_)` - If embedding or search fails
    pub async fn retrieve(
        &self,
        query: &str,
        limit: usize,
        source_filter: Option<&str>,
    ) -> RagResult<Vec<SearchHit>> {
        tracing::debug!(query, limit, source_filter, "Retrieving chunks");

        let filter = source_filter.map(FieldFilter::source_id);
        let hits = self.index.search(query, limit, filter.as_ref()).await?;

        tracing::debug!(hits = hits.len(), "Retrieved chunks");
        Ok(hits)
    }

    /// Retrieve and join chunks into a context block of at most `max_chars` characters.
    ///
    /// A zero budget returns an empty string without querying.
    pub async fn get_context(&self, query: &str, limit: usize, max_chars: usize) -> RagResult<String> {
        if max_chars == 0 {
            return Ok(String::new());
        }

        let hits = self.retrieve(query, limit, None).await?;
        Ok(assemble_context(&hits, max_chars))
    }
}

/// Join hits as `[Source: title]` entries until the next one would exceed `max_chars`.
///
/// Entries are never cut. The delimiter before an entry counts towards that
/// entry, and assembly stops at the first entry that does not fit.
pub fn assemble_context(hits: &[SearchHit], max_chars: usize) -> String {
    let delimiter_len = CONTEXT_DELIMITER.chars().count();
    let mut context = String::new();
    let mut used = 0;

    for (i, hit) in hits.iter().enumerate() {
        let entry = format!(
            "[Source: {}]\n{}",
            hit.title().unwrap_or(UNKNOWN_TITLE),
            hit.text
        );
        let separator = if i == 0 { 0 } else { delimiter_len };
        let cost = separator + entry.chars().count();

        if used + cost > max_chars {
            break;
        }

        if i > 0 {
            context.push_str(CONTEXT_DELIMITER);
        }
        context.push_str(&entry);
        used += cost;
    }

    context
}

/// Build an augmented prompt with retrieved context
///
/// Returns `question` unchanged when `context` is empty.
pub fn build_augmented_prompt(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return question.to_string();
    }

    format!(
        r#"Use the following news excerpts to answer the question. If they do not contain the answer, say so before answering from general knowledge.

## Context

{context}

## Question

{question}

## Instructions

Cite the sources you rely on by their [Source: ...] tags."#
    )
}
