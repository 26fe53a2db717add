use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding service returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for embedding backends (OpenAI, Ollama).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let vectors = self.embed_batch(&[text]).await?;
        let actual = vectors.len();
        match vectors.into_iter().next() {
            Some(v) if actual == 1 => Ok(v),
            _ => Err(EmbeddingError::CountMismatch { expected: 1, actual }),
        }
    }

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Model identifier; vectors from different models are not comparable.
    fn model(&self) -> &str;
}

/// Check a backend response against the request size and declared dimensions.
pub(crate) fn validate_vectors(
    vectors: &[Vec<f32>],
    inputs: usize,
    dimensions: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != inputs {
        return Err(EmbeddingError::CountMismatch {
            expected: inputs,
            actual: vectors.len(),
        });
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Vec<f32>>);

    #[async_trait]
    impl Embedder for Fixed {
        async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(self.0.clone())
        }
        fn dimensions(&self) -> usize {
            2
        }
        fn model(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn embed_returns_the_single_vector() {
        let e = Fixed(vec![vec![1.0, 0.0]]);
        assert_eq!(e.embed("x").await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn embed_rejects_wrong_vector_count() {
        let none = Fixed(vec![]);
        assert!(matches!(
            none.embed("x").await,
            Err(EmbeddingError::CountMismatch { expected: 1, actual: 0 })
        ));
        let two = Fixed(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(matches!(
            two.embed("x").await,
            Err(EmbeddingError::CountMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn validate_vectors_checks_count_and_dimensions() {
        assert!(validate_vectors(&[vec![0.0; 3]], 1, 3).is_ok());
        assert!(matches!(
            validate_vectors(&[vec![0.0; 3]], 2, 3),
            Err(EmbeddingError::CountMismatch { .. })
        ));
        assert!(matches!(
            validate_vectors(&[vec![0.0; 3], vec![0.0; 4]], 2, 3),
            Err(EmbeddingError::DimensionMismatch { expected: 3, actual: 4 })
        ));
    }
}
