use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::Endpoint;
use super::traits::{Embedder, EmbeddingError};

/// Local Ollama server, `/api/embed` (batch input).
pub struct OllamaEmbedder {
    endpoint: Endpoint,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, dimensions: usize) -> Self {
        Self {
            endpoint: Endpoint::new(&url, "api/embed", model, dimensions),
        }
    }
}

#[derive(Serialize)]
struct EmbedBody<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedReply {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbedBody {
            model: &self.endpoint.model,
            input: texts,
        };
        let reply: EmbedReply = self.endpoint.post(&body).await?;
        self.endpoint.accept(reply.embeddings, texts.len())
    }

    fn dimensions(&self) -> usize {
        self.endpoint.dimensions
    }

    fn model(&self) -> &str {
        &self.endpoint.model
    }
}
