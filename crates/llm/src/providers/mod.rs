pub mod ollama;
pub mod openai;

use std::sync::Arc;

use amanah_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Create the appropriate LLM provider based on config.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or(DEFAULT_OPENAI_BASE_URL);
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "ollama" => Ok(Arc::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amanah_core::Config;

    #[test]
    fn openai_without_key_is_not_configured() {
        let mut cfg = Config::for_profile("AMNTESTLLM");
        cfg.llm.provider = "openai".into();
        cfg.llm.openai_api_key = None;
        assert!(matches!(
            create_provider(&cfg.llm, &cfg.ollama),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn ollama_needs_no_key() {
        let mut cfg = Config::for_profile("AMNTESTLLM");
        cfg.llm.provider = "ollama".into();
        assert!(create_provider(&cfg.llm, &cfg.ollama).is_ok());
    }

    #[test]
    fn unknown_provider() {
        let mut cfg = Config::for_profile("AMNTESTLLM");
        cfg.llm.provider = "gemini".into();
        match create_provider(&cfg.llm, &cfg.ollama) {
            Err(LlmError::NotConfigured(msg)) => assert!(msg.contains("gemini")),
            _ => panic!("expected NotConfigured"),
        }
    }
}
