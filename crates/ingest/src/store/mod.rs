//! Persistence of (title, content, embedding) records and similarity search.

mod memory;
mod supabase;

use amanah_core::{DocId, ScoredDocument};
use async_trait::async_trait;
use thiserror::Error;

use crate::embedding::EmbeddingError;

pub use memory::{cosine_similarity, MemoryStore};
pub use supabase::{SupabaseStore, UPLOAD_EMBEDDING_MODEL};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected with {status}: {body}")]
    Upload { status: u16, body: String },

    #[error("Search failed with {status}: {body}")]
    Search { status: u16, body: String },

    #[error("Unexpected store response: {0}")]
    InvalidResponse(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Document store not configured: {0}")]
    NotConfigured(String),
}

/// Storage collaborator holding embedded documents.
///
/// The store computes embeddings for inserted content itself, so callers only
/// hand over text.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist one document and return its identifier.
    async fn insert(&self, title: &str, content: &str) -> Result<DocId, StoreError>;

    /// Documents whose cosine similarity to `query_embedding` is at least
    /// `threshold`, best first, at most `limit` of them.
    async fn search(
        &self,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, StoreError>;

    /// Embedding model used for stored vectors, when the store declares one.
    fn embedding_model(&self) -> Option<&str>;
}
