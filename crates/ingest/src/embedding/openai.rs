use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::Endpoint;
use super::traits::{Embedder, EmbeddingError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible `/v1/embeddings`. Items may arrive out of order and are
/// placed back by their `index`.
pub struct OpenAiEmbedder {
    endpoint: Endpoint,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, base_url: Option<String>, dimensions: usize) -> Self {
        let base_url = base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL);
        Self {
            endpoint: Endpoint::new(base_url, "v1/embeddings", model, dimensions).with_bearer(api_key),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingsBody<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingsReply {
    data: Vec<IndexedVector>,
}

#[derive(Deserialize)]
struct IndexedVector {
    index: usize,
    embedding: Vec<f32>,
}

fn in_input_order(mut items: Vec<IndexedVector>) -> Vec<Vec<f32>> {
    items.sort_by_key(|item| item.index);
    items.into_iter().map(|item| item.embedding).collect()
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbeddingsBody {
            model: &self.endpoint.model,
            input: texts,
        };
        let reply: EmbeddingsReply = self.endpoint.post(&body).await?;
        self.endpoint.accept(in_input_order(reply.data), texts.len())
    }

    fn dimensions(&self) -> usize {
        self.endpoint.dimensions
    }

    fn model(&self) -> &str {
        &self.endpoint.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_reordered_by_index() {
        let items = vec![
            IndexedVector { index: 2, embedding: vec![2.0] },
            IndexedVector { index: 0, embedding: vec![0.0] },
            IndexedVector { index: 1, embedding: vec![1.0] },
        ];
        assert_eq!(in_input_order(items), vec![vec![0.0], vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        // Unroutable base URL: any request would fail.
        let embedder = OpenAiEmbedder::new("sk".into(), "m".into(), Some("http://127.0.0.1:9".into()), 3);
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
