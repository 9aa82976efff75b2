//! Infrastructure adapters for external systems.

pub mod embeddings;
pub mod qdrant;
