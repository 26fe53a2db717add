use std::sync::Arc;
use std::time::Duration;

use amanah_core::config::IngestConfig;
use amanah_core::{Chunk, DocId};
use tracing::{debug, info, warn};

use crate::store::{DocumentStore, StoreError};

/// Progress notification for one chunk.
#[derive(Debug)]
pub enum UploadEvent<'a> {
    Uploaded {
        index: usize,
        total: usize,
        title: &'a str,
        id: &'a str,
    },
    Failed {
        index: usize,
        total: usize,
        title: &'a str,
        error: &'a StoreError,
    },
}

/// Tally of an upload run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub attempted: usize,
    pub succeeded: usize,
    /// Title and error message of every chunk that could not be stored.
    pub failures: Vec<(String, String)>,
}

impl UploadSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential, rate-limited uploader.
///
/// Chunks are sent one at a time with `delay` between requests. A failed
/// chunk is retried up to `retries` more times after the same delay, then
/// recorded; the run always continues with the next chunk.
pub struct Uploader {
    store: Arc<dyn DocumentStore>,
    delay: Duration,
    retries: u32,
}

impl Uploader {
    pub fn new(store: Arc<dyn DocumentStore>, delay: Duration, retries: u32) -> Self {
        Self {
            store,
            delay,
            retries,
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &IngestConfig) -> Self {
        Self::new(
            store,
            Duration::from_millis(config.upload_delay_ms),
            config.upload_retries,
        )
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    async fn upload_one(&self, chunk: &Chunk) -> Result<DocId, StoreError> {
        let mut attempt = 0u32;
        loop {
            match self.store.insert(&chunk.title, &chunk.content).await {
                Ok(id) => return Ok(id),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(title = %chunk.title, error = %e, attempt, "upload failed, retrying");
                    self.pause().await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Upload `chunks` in order, reporting each outcome to `on_event`.
    pub async fn upload<F>(&self, chunks: &[&Chunk], mut on_event: F) -> UploadSummary
    where
        F: FnMut(UploadEvent<'_>),
    {
        let total = chunks.len();
        let mut summary = UploadSummary::default();

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            summary.attempted += 1;

            match self.upload_one(chunk).await {
                Ok(id) => {
                    summary.succeeded += 1;
                    debug!(%id, title = %chunk.title, "chunk stored");
                    on_event(UploadEvent::Uploaded {
                        index: i + 1,
                        total,
                        title: &chunk.title,
                        id: &id,
                    });
                }
                Err(error) => {
                    warn!(title = %chunk.title, error = %error, "chunk upload failed");
                    on_event(UploadEvent::Failed {
                        index: i + 1,
                        total,
                        title: &chunk.title,
                        error: &error,
                    });
                    summary.failures.push((chunk.title.clone(), error.to_string()));
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed(),
            "upload finished"
        );
        summary
    }
}
