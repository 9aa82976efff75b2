pub mod blocking;
pub mod embedder;
pub mod retriever;
pub mod vector_index;

pub use blocking::BlockingRetriever;
pub use embedder::Embedder;
pub use retriever::{
    assemble_context, build_augmented_prompt, Retriever, CONTEXT_DELIMITER, UNKNOWN_TITLE,
};
pub use vector_index::VectorIndex;
