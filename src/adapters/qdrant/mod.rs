//! Qdrant vector database adapter.

pub mod client;
pub mod models;

pub use client::QdrantBackend;
