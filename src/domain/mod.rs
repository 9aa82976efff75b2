//! Domain layer for the retrieval pipeline
//!
//! Pure data types, the error taxonomy, and the port traits that
//! embedding and vector-index adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RagError, RagResult};
