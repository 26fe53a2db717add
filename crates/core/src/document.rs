use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier assigned to a stored document by the storage collaborator.
pub type DocId = String;

/// Per-run chunking options. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Maximum characters per chunk (default: 3000).
    pub chunk_size: usize,
    /// Trailing characters of a chunk repeated at the start of the next one
    /// in the paragraph path (default: 200).
    pub overlap: usize,
    /// Chunks shorter than this are dropped (default: 500).
    pub min_chunk_size: usize,
    /// Trailing words repeated when an oversized section is word-split
    /// (default: 20).
    pub overlap_words: usize,
    /// Prepended to every chunk title.
    pub title_prefix: String,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 3000,
            overlap: 200,
            min_chunk_size: 500,
            overlap_words: 20,
            title_prefix: "Islamic Finance".to_string(),
        }
    }
}

impl ProcessingOptions {
    /// Reject options the chunker cannot make progress with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.chunk_size == 0 {
            return Err(CoreError::InvalidOptions("chunk_size must be positive".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(CoreError::InvalidOptions(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        if self.min_chunk_size > self.chunk_size {
            return Err(CoreError::InvalidOptions(format!(
                "min_chunk_size ({}) must not exceed chunk_size ({})",
                self.min_chunk_size, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// A titled unit of text ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Chunk {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source_file: None,
        }
    }

    /// Content length in characters, the unit all size limits are expressed in.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A record held by the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

impl IndexedDocument {
    /// Create a fresh record with a random id, stamped now.
    pub fn new(title: String, content: String, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// A search hit: stored document plus its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub similarity: f32,
}
