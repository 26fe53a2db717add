pub mod chunker;
mod convert;
mod pdf;
pub mod structure;
pub mod title;
mod txt;
mod word;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use convert::{ConverterCommand, Converters};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Conversion with {tool} failed: {message}")]
    Conversion { tool: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source format of a document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Word,
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "txt" | "text" | "md" => Ok(Self::Text),
            "docx" => Ok(Self::Word),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExtractionError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{other}")
            })),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Word => "word",
            Self::Pdf => "pdf",
        }
    }
}

/// A file as read from disk, before extraction.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source_path: PathBuf,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    /// Read a file and classify it. Unsupported extensions fail before any IO.
    pub fn open(path: &Path) -> Result<Self, ExtractionError> {
        let kind = DocumentKind::from_path(path)?;
        let bytes = std::fs::read(path)?;
        Ok(Self {
            source_path: path.to_path_buf(),
            kind,
            bytes,
        })
    }
}

/// Text produced from one raw document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    /// File name the text came from, used to tag chunks.
    pub source_label: String,
}

impl ExtractedText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Read `path` and turn it into UTF-8 text, invoking external converters
/// for word and PDF documents.
pub fn extract(path: &Path, converters: &Converters) -> Result<ExtractedText, ExtractionError> {
    let raw = RawDocument::open(path)?;
    extract_raw(&raw, converters)
}

pub fn extract_raw(raw: &RawDocument, converters: &Converters) -> Result<ExtractedText, ExtractionError> {
    let text = match raw.kind {
        DocumentKind::Text => txt::extract_txt(&raw.bytes),
        DocumentKind::Word => word::extract_docx(&raw.source_path, converters)?,
        DocumentKind::Pdf => pdf::extract_pdf(&raw.source_path, converters)?,
    };

    let source_label = raw
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.source_path.display().to_string());

    info!(
        file = %raw.source_path.display(),
        kind = raw.kind.as_str(),
        chars = text.chars().count(),
        "document extracted"
    );

    Ok(ExtractedText { text, source_label })
}
