//! Text chunking domain models
//!
//! Documents are split into overlapping chunks before embedding. Each chunk
//! carries the caller's document metadata with its own `chunk_index` merged in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::{RagError, RagResult};

/// Default chunk window, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive windows, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Metadata key carrying a chunk's position within its document.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";

/// A scalar metadata value.
///
/// Index payloads only hold flat JSON, so nested values are unrepresentable
/// here and rejected at the JSON boundary by [`metadata_from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Document or chunk metadata, ordered by key.
pub type Metadata = BTreeMap<String, MetadataValue>;

impl MetadataValue {
    /// Borrow the value as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a JSON value for index payloads.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Convert a JSON scalar back into a metadata value.
    ///
    /// Returns `None` for null, arrays, objects and integers outside `i64`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) if n.is_f64() => n.as_f64().map(Self::Float),
            serde_json::Value::Number(n) => n.as_i64().map(Self::Integer),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    /// Parse a command-line style value: bool, then integer, then float, else string.
    pub fn parse_loose(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            return Self::Bool(b);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::String(raw.to_string()),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Convert a JSON object into [`Metadata`], rejecting anything non-scalar.
///
/// `null` is accepted as "no metadata".
pub fn metadata_from_json(value: serde_json::Value) -> RagResult<Metadata> {
    let object = match value {
        serde_json::Value::Null => return Ok(Metadata::new()),
        serde_json::Value::Object(object) => object,
        other => {
            return Err(RagError::invalid_input(format!(
                "metadata must be a JSON object, got {other}"
            )))
        }
    };

    object
        .into_iter()
        .map(|(key, value)| match MetadataValue::from_json(&value) {
            Some(scalar) => Ok((key, scalar)),
            None => Err(RagError::invalid_input(format!(
                "metadata field '{key}' must be a string, number or bool"
            ))),
        })
        .collect()
}

/// Parse a JSON document into [`Metadata`].
///
/// Malformed JSON is a `Serialization` error; well-formed JSON that is not a
/// flat object is `InvalidInput`.
pub fn metadata_from_json_str(raw: &str) -> RagResult<Metadata> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    metadata_from_json(value)
}

/// Check that every value can be stored in an index payload.
///
/// JSON has no NaN or infinity, so non-finite floats would be written as
/// `null` and silently dropped on the way back.
pub fn validate_metadata(metadata: &Metadata) -> RagResult<()> {
    match metadata
        .iter()
        .find(|(_, value)| matches!(value, MetadataValue::Float(f) if !f.is_finite()))
    {
        Some((key, value)) => Err(RagError::invalid_input(format!(
            "metadata field '{key}' must be a finite number, got {value}"
        ))),
        None => Ok(()),
    }
}

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,

    /// Characters of the previous window repeated at the start of the next one
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    /// Create a configuration with explicit sizes (not yet validated).
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Small chunks: more precise retrieval, less surrounding context.
    pub const fn small() -> Self {
        Self::new(256, 32)
    }

    /// Large chunks: broader context per hit.
    pub const fn large() -> Self {
        Self::new(1000, 100)
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> RagResult<()> {
        if self.chunk_size == 0 {
            return Err(RagError::invalid_input("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::invalid_input(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed chunk text
    pub text: String,

    /// Document metadata with `chunk_index` merged in
    pub metadata: Metadata,

    /// Position of this chunk within its document (0-based, contiguous)
    pub chunk_index: usize,
}

impl Chunk {
    /// Create a chunk, merging `chunk_index` into a copy of the document metadata.
    pub fn new(text: impl Into<String>, chunk_index: usize, document_metadata: &Metadata) -> Self {
        let mut metadata = document_metadata.clone();
        metadata.insert(CHUNK_INDEX_KEY.to_string(), chunk_index.into());

        Self {
            text: text.into(),
            metadata,
            chunk_index,
        }
    }

    /// Returns true if this is the first chunk
    pub const fn is_first(&self) -> bool {
        self.chunk_index == 0
    }
}

/// A document queued for ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}
