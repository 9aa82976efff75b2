//! newsminds - retrieval-augmented generation over news articles
//!
//! newsminds splits articles into overlapping chunks, embeds them, stores the
//! vectors in a similarity index and retrieves the most relevant chunks for a
//! question, assembled into a bounded context block for a language model.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the embedding/index ports
//! - **Service Layer** (`services`): Embedder, vector index and retriever
//! - **Adapter Layer** (`adapters`): OpenAI-compatible embeddings and Qdrant
//! - **Infrastructure Layer** (`infrastructure`): Chunking, local model and
//!   index, configuration, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use newsminds::Retriever;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = newsminds::ConfigLoader::load()?;
//!     let retriever = Retriever::from_config(&config)?;
//!
//!     retriever.ingest_document("Rates held steady.", None, None).await?;
//!     let context = retriever.get_context("interest rates", 5, 12_000).await?;
//!     println!("{context}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Chunk, ChunkingConfig, Config, Document, EmbeddingConfig, IndexConfig, Metadata,
    MetadataValue, SearchHit,
};
pub use domain::ports::{EmbeddingModelLoader, EmbeddingProvider, VectorBackend};
pub use domain::{RagError, RagResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::vector::{chunk_text, Chunker};
pub use services::{
    assemble_context, build_augmented_prompt, BlockingRetriever, Embedder, Retriever,
    VectorIndex,
};
