//! JSON-over-HTTP plumbing shared by the remote embedding backends.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::traits::{validate_vectors, EmbeddingError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// One embedding endpoint: where to post, as which model, and what shape the
/// vectors must have.
pub(crate) struct Endpoint {
    client: Client,
    url: String,
    bearer: Option<String>,
    pub(crate) model: String,
    pub(crate) dimensions: usize,
}

impl Endpoint {
    pub(crate) fn new(base_url: &str, path: &str, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url: format!("{}/{path}", base_url.trim_end_matches('/')),
            bearer: None,
            model,
            dimensions,
        }
    }

    pub(crate) fn with_bearer(mut self, token: String) -> Self {
        self.bearer = Some(token);
        self
    }

    /// POST `body`; a non-2xx reply becomes `EmbeddingError::Service`.
    pub(crate) async fn post<B, R>(&self, body: &B) -> Result<R, EmbeddingError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Service {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Accept `vectors` only if they answer all `inputs` with the declared width.
    pub(crate) fn accept(&self, vectors: Vec<Vec<f32>>, inputs: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        validate_vectors(&vectors, inputs, self.dimensions)?;
        debug!(url = %self.url, model = %self.model, count = inputs, "embedded batch");
        Ok(vectors)
    }
}
