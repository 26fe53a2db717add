mod http;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use amanah_core::config::{EmbeddingConfig, OllamaConfig};
use tracing::info;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the embedder selected by `config.provider`.
pub fn create_embedder(
    config: &EmbeddingConfig,
    ollama: &OllamaConfig,
) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY is not set".into()))?;
            info!(model = %config.model, dimensions = config.dimensions, "using OpenAI embeddings");
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.model.clone(),
                config.openai_base_url.clone(),
                config.dimensions,
            )))
        }
        "ollama" => {
            info!(
                url = %ollama.url,
                model = %ollama.embedding_model,
                dimensions = config.dimensions,
                "using Ollama embeddings"
            );
            Ok(Arc::new(OllamaEmbedder::new(
                ollama.url.clone(),
                ollama.embedding_model.clone(),
                config.dimensions,
            )))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amanah_core::Config;

    #[test]
    fn openai_requires_api_key() {
        let mut cfg = Config::for_profile("AMNTESTEMB");
        cfg.embedding.provider = "openai".into();
        cfg.embedding.openai_api_key = None;
        let err = create_embedder(&cfg.embedding, &cfg.ollama).err().unwrap();
        assert!(matches!(err, EmbeddingError::NotConfigured(_)));
    }

    #[test]
    fn selects_backend_by_provider() {
        let mut cfg = Config::for_profile("AMNTESTEMB");
        cfg.embedding.provider = "openai".into();
        cfg.embedding.openai_api_key = Some("sk-test".into());
        let openai = create_embedder(&cfg.embedding, &cfg.ollama).unwrap();
        assert_eq!(openai.model(), cfg.embedding.model);

        cfg.embedding.provider = "ollama".into();
        let ollama = create_embedder(&cfg.embedding, &cfg.ollama).unwrap();
        assert_eq!(ollama.model(), cfg.ollama.embedding_model);
        assert_eq!(ollama.dimensions(), cfg.embedding.dimensions);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut cfg = Config::for_profile("AMNTESTEMB");
        cfg.embedding.provider = "onnx".into();
        assert!(create_embedder(&cfg.embedding, &cfg.ollama).is_err());
    }
}
