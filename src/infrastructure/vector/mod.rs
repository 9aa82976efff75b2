//! Vector infrastructure components
//!
//! Provides text chunking, the local hashed embedding model and the
//! in-process vector backend.

pub mod chunker;
pub mod hashed_embedding;
pub mod memory_backend;

pub use chunker::{chunk_text, Chunker};
pub use hashed_embedding::HashedEmbeddingProvider;
pub use memory_backend::{cosine_similarity, InMemoryBackend};
