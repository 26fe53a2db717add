use amanah_core::config::SupabaseConfig;
use amanah_core::{DocId, ScoredDocument};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{DocumentStore, StoreError};

/// Model the `upload-doc` function embeds with.
pub const UPLOAD_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Hosted store: inserts go through the `upload-doc` edge function, searches
/// through the `match_docs` RPC.
pub struct SupabaseStore {
    client: Client,
    url: String,
    service_key: String,
    embedding_model: Option<String>,
}

impl SupabaseStore {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            url: url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            embedding_model: Some(UPLOAD_EMBEDDING_MODEL.to_string()),
        }
    }

    pub fn from_config(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let key = config.service_key.as_deref().ok_or_else(|| {
            StoreError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY is not set".into())
        })?;
        Ok(Self::new(&config.url, key))
    }

    /// Override the declared embedding model (`None` skips the model check).
    pub fn with_embedding_model(mut self, model: Option<String>) -> Self {
        self.embedding_model = model;
        self
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/{path}", self.url))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    data: Vec<StoredRow>,
}

#[derive(Deserialize)]
struct StoredRow {
    id: Value,
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

#[derive(Deserialize)]
struct MatchRow {
    id: Value,
    title: String,
    content: String,
    similarity: f32,
}

/// Row ids may be serial integers or uuids depending on the table definition.
fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn insert(&self, title: &str, content: &str) -> Result<DocId, StoreError> {
        let response = self
            .post("functions/v1/upload-doc")
            .json(&UploadRequest { title, content })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Upload { status, body });
        }

        let parsed: UploadResponse = response.json().await?;
        let row = parsed
            .data
            .first()
            .ok_or_else(|| StoreError::InvalidResponse("upload returned no rows".into()))?;
        let id = id_to_string(&row.id);
        debug!(%id, title, "uploaded document");
        Ok(id)
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredDocument>, StoreError> {
        let response = self
            .post("rest/v1/rpc/match_docs")
            .json(&MatchRequest {
                query_embedding,
                match_threshold: threshold,
                match_count: limit,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Search { status, body });
        }

        let rows: Vec<MatchRow> = response.json().await?;
        let mut hits: Vec<ScoredDocument> = rows
            .into_iter()
            .filter(|r| r.similarity >= threshold)
            .map(|r| ScoredDocument {
                id: id_to_string(&r.id),
                title: r.title,
                content: r.content,
                similarity: r.similarity,
            })
            .collect();
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(limit);
        Ok(hits)
    }

    fn embedding_model(&self) -> Option<&str> {
        self.embedding_model.as_deref()
    }
}
