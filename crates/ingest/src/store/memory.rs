use std::sync::Arc;

use amanah_core::{DocId, IndexedDocument, ScoredDocument};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocumentStore, StoreError};
use crate::embedding::Embedder;

/// Cosine similarity of two vectors; 0.0 when either has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// In-process store with brute-force search. Used for dry runs and tests.
pub struct MemoryStore {
    embedder: Arc<dyn Embedder>,
    docs: RwLock<Vec<IndexedDocument>>,
}

impl MemoryStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            docs: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    /// Snapshot of stored documents in insertion order.
    pub async fn documents(&self) -> Vec<IndexedDocument> {
        self.docs.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, title: &str, content: &str) -> Result<DocId, StoreError> {
        let embedding = self.embedder.embed(content).await?;
        let doc = IndexedDocument::new(title.to_string(), content.to_string(), embedding);
        let id = doc.id.clone();
        self.docs.write().await.push(doc);
        debug!(%id, title, "stored document in memory");
        Ok(id)
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, StoreError> {
        let docs = self.docs.read().await;
        let mut hits: Vec<ScoredDocument> = docs
            .iter()
            .filter_map(|doc| {
                let similarity = cosine_similarity(query_embedding, &doc.embedding);
                (similarity >= threshold).then(|| ScoredDocument {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    content: doc.content.clone(),
                    similarity,
                })
            })
            .collect();

        // Stable: equal scores keep insertion order.
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(limit);
        Ok(hits)
    }

    fn embedding_model(&self) -> Option<&str> {
        Some(self.embedder.model())
    }
}
