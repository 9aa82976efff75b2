pub mod chunking;
pub mod config;
pub mod search;

pub use chunking::{
    metadata_from_json, metadata_from_json_str, validate_metadata, Chunk, ChunkingConfig,
    Document, Metadata, MetadataValue, CHUNK_INDEX_KEY, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use config::{
    Config, EmbeddingConfig, EmbeddingProviderKind, IndexConfig, LogFormat, LoggingConfig,
    RetrievalConfig, RotationPolicy, DEFAULT_CONTEXT_CHARS, DEFAULT_RETRIEVAL_LIMIT,
    MEMORY_LOCATION,
};
pub use search::{
    CollectionInfo, FieldFilter, IndexedPoint, Payload, ScoredPoint, SearchHit, SOURCE_ID_FIELD,
    TEXT_FIELD, TITLE_FIELD,
};
