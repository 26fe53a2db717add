use std::sync::Arc;

use amanah_core::ScoredDocument;
use amanah_ingest::{DocumentStore, Embedder, EmbeddingError, StoreError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("query embedding model '{embedder}' differs from the store's '{store}'")]
    EmbeddingModelMismatch { embedder: String, store: String },

    #[error("failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("document search failed: {0}")]
    Store(#[from] StoreError),
}

/// Query-time lookup of stored documents by embedding similarity.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
}

impl Retriever {
    /// Pair an embedder with a store. Refused when the store declares a
    /// different embedding model, since the vectors would not be comparable.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn DocumentStore>) -> Result<Self, RetrievalError> {
        if let Some(store_model) = store.embedding_model() {
            if store_model != embedder.model() {
                return Err(RetrievalError::EmbeddingModelMismatch {
                    embedder: embedder.model().to_string(),
                    store: store_model.to_string(),
                });
            }
        }
        Ok(Self { embedder, store })
    }

    /// Up to `k` documents with similarity at least `threshold`, best first.
    /// An empty result is a normal outcome.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;
        let mut docs = self.store.search(&embedding, threshold, k).await?;

        docs.retain(|d| d.similarity >= threshold);
        docs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        docs.truncate(k);

        debug!(k, threshold, hits = docs.len(), "retrieved documents");
        Ok(docs)
    }
}
