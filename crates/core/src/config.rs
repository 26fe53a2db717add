use std::env;

use serde::{Deserialize, Serialize};

use crate::document::ProcessingOptions;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub supabase: SupabaseConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub ingest: IngestConfig,
    pub retrieval: RetrievalConfig,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &["SUPABASE_URL", "OPENAI_API_KEY", "OLLAMA_URL"];

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `AMANAH_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("AMANAH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            supabase: SupabaseConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            ingest: IngestConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
        }
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  supabase:    url={}, configured={}", self.supabase.url, self.supabase.is_configured());
        tracing::info!("  embedding:   provider={}, model={}, dims={}", self.embedding.provider, self.embedding.model, self.embedding.dimensions);
        tracing::info!("  llm:         provider={}", self.llm.provider);
        tracing::info!("  ollama:      url={}", self.ollama.url);
        tracing::info!(
            "  ingest:      chunk_size={}, overlap={}, min_chunk_size={}, delay={}ms",
            self.ingest.chunk_size,
            self.ingest.overlap,
            self.ingest.min_chunk_size,
            self.ingest.upload_delay_ms
        );
        tracing::info!("  retrieval:   k={}, threshold={}", self.retrieval.match_count, self.retrieval.match_threshold);
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "supabase": {
                "url": self.supabase.url,
                "configured": self.supabase.is_configured(),
            },
            "embedding": {
                "provider": self.embedding.provider,
                "model": self.embedding.model,
                "dimensions": self.embedding.dimensions,
                "configured": self.embedding.is_configured(),
            },
            "llm": {
                "provider": self.llm.provider,
                "model": self.llm.openai_model,
                "configured": self.llm.is_configured(),
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.model },
            "ingest": {
                "chunk_size": self.ingest.chunk_size,
                "overlap": self.ingest.overlap,
                "min_chunk_size": self.ingest.min_chunk_size,
                "title_prefix": self.ingest.title_prefix,
                "upload_delay_ms": self.ingest.upload_delay_ms,
                "upload_retries": self.ingest.upload_retries,
            },
            "retrieval": {
                "match_count": self.retrieval.match_count,
                "match_threshold": self.retrieval.match_threshold,
                "history_limit": self.retrieval.history_limit,
            },
        })
    }
}

// ── Supabase (document store + edge functions) ───────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: Option<String>,
}

impl SupabaseConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "SUPABASE_URL", "http://127.0.0.1:54321"),
            service_key: profiled_env_opt(p, "SUPABASE_SERVICE_ROLE_KEY"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service_key.is_some()
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "openai", "ollama"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "openai"),
            model: profiled_env_or(p, "EMBEDDING_MODEL", "text-embedding-3-small"),
            dimensions: profiled_env_parse(p, "EMBEDDING_DIMENSIONS", 1536),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── LLM (completion) ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "openai"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.7),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", 1000),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Ingestion ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub min_chunk_size: usize,
    pub overlap_words: usize,
    pub title_prefix: String,
    /// Fixed pause between upload requests.
    pub upload_delay_ms: u64,
    /// Extra attempts per chunk after a failed upload (same fixed delay).
    pub upload_retries: u32,
    pub pandoc_path: String,
    pub pdftotext_path: String,
    pub mutool_path: String,
}

impl IngestConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = ProcessingOptions::default();
        Self {
            chunk_size: profiled_env_parse(p, "CHUNK_SIZE", defaults.chunk_size),
            overlap: profiled_env_parse(p, "CHUNK_OVERLAP", defaults.overlap),
            min_chunk_size: profiled_env_parse(p, "MIN_CHUNK_SIZE", defaults.min_chunk_size),
            overlap_words: profiled_env_parse(p, "OVERLAP_WORDS", defaults.overlap_words),
            title_prefix: profiled_env_or(p, "TITLE_PREFIX", &defaults.title_prefix),
            upload_delay_ms: profiled_env_parse(p, "UPLOAD_DELAY_MS", 300),
            upload_retries: profiled_env_parse(p, "UPLOAD_RETRIES", 0),
            pandoc_path: profiled_env_or(p, "PANDOC_PATH", "pandoc"),
            pdftotext_path: profiled_env_or(p, "PDFTOTEXT_PATH", "pdftotext"),
            mutool_path: profiled_env_or(p, "MUTOOL_PATH", "mutool"),
        }
    }

    pub fn processing_options(&self) -> ProcessingOptions {
        ProcessingOptions {
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            min_chunk_size: self.min_chunk_size,
            overlap_words: self.overlap_words,
            title_prefix: self.title_prefix.clone(),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub match_count: usize,
    pub match_threshold: f32,
    /// Most recent chat messages forwarded to the completion model.
    pub history_limit: usize,
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            match_count: profiled_env_parse(p, "MATCH_COUNT", 5),
            match_threshold: profiled_env_parse(p, "MATCH_THRESHOLD", 0.7),
            history_limit: profiled_env_parse(p, "HISTORY_LIMIT", 10),
        }
    }
}
