//! Per-file processing and batch ingestion.
//!
//! Files are processed strictly one at a time: extract, chunk, then upload
//! each chunk with a fixed pause between requests. A failing file or chunk is
//! recorded and the batch moves on.

mod upload;

use std::path::{Path, PathBuf};

use amanah_core::{Chunk, CoreError, ProcessingOptions};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::document::chunker::chunk_text;
use crate::document::{extract, Converters, ExtractionError};

pub use upload::{UploadEvent, UploadSummary, Uploader};

/// Extensions accepted by batch ingestion (lowercase, without dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("No chunks produced from {document}")]
    NoChunksProduced { document: String },

    #[error("Invalid processing options: {0}")]
    InvalidOptions(String),

    #[error("No supported files found in {0}")]
    NoSupportedFiles(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidOptions(msg) => Self::InvalidOptions(msg),
            CoreError::Io(e) => Self::Io(e),
            CoreError::Config(msg) => Self::InvalidOptions(msg),
        }
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Supported files under `dir`, recursively, in path order.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_supported(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::NoSupportedFiles(dir.display().to_string()));
    }
    info!(dir = %dir.display(), count = files.len(), "discovered documents");
    Ok(files)
}

/// Chunk already-extracted text, tagging every chunk with `source`.
pub fn chunk_document(
    text: &str,
    source: &str,
    options: &ProcessingOptions,
) -> Result<Vec<Chunk>, PipelineError> {
    options.validate()?;

    let mut chunks = chunk_text(text, options);
    if chunks.is_empty() {
        return Err(PipelineError::NoChunksProduced {
            document: source.to_string(),
        });
    }
    for chunk in &mut chunks {
        chunk.source_file = Some(source.to_string());
    }
    Ok(chunks)
}

/// One file turned into chunks, ready for upload.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub path: PathBuf,
    pub source_label: String,
    pub char_count: usize,
    pub chunks: Vec<Chunk>,
}

/// Extract and chunk a single file.
pub fn prepare_file(
    path: &Path,
    converters: &Converters,
    options: &ProcessingOptions,
) -> Result<PreparedDocument, PipelineError> {
    let extracted = extract(path, converters)?;
    let chunks = chunk_document(&extracted.text, &extracted.source_label, options)?;

    info!(
        file = %path.display(),
        chars = extracted.char_count(),
        chunks = chunks.len(),
        "document chunked"
    );

    Ok(PreparedDocument {
        path: path.to_path_buf(),
        char_count: extracted.char_count(),
        source_label: extracted.source_label,
        chunks,
    })
}

/// Outcome of preparing a batch: successes plus per-file failures.
#[derive(Debug, Default)]
pub struct BatchPreparation {
    pub documents: Vec<PreparedDocument>,
    pub failures: Vec<(PathBuf, PipelineError)>,
}

impl BatchPreparation {
    pub fn chunk_count(&self) -> usize {
        self.documents.iter().map(|d| d.chunks.len()).sum()
    }

    /// All chunks across documents, in file order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.documents.iter().flat_map(|d| d.chunks.iter())
    }
}

/// Prepare every file in order; a failing file is recorded, not fatal.
pub fn prepare_files(
    paths: &[PathBuf],
    converters: &Converters,
    options: &ProcessingOptions,
) -> Result<BatchPreparation, PipelineError> {
    options.validate()?;

    let mut batch = BatchPreparation::default();
    for path in paths {
        match prepare_file(path, converters, options) {
            Ok(doc) => batch.documents.push(doc),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "document skipped");
                batch.failures.push((path.clone(), e));
            }
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests;
