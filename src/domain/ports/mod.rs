//! Port trait definitions (Hexagonal Architecture)
//!
//! - `EmbeddingProvider` / `EmbeddingModelLoader`: text to vectors
//! - `VectorBackend`: collection lifecycle, point upsert, similarity query
//!
//! Services depend on these traits only; Qdrant, OpenAI-compatible and
//! in-process implementations live in `adapters` and `infrastructure`.

pub mod embedding;
pub mod vector_backend;

pub use embedding::{EmbeddingModelLoader, EmbeddingProvider, PreloadedModel};
pub use vector_backend::VectorBackend;
