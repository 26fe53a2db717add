//! Document ingestion: extraction, structure-aware chunking, embeddings and
//! storage of chunks for retrieval.

pub mod document;
pub mod embedding;
pub mod pipeline;
pub mod store;

pub use document::chunker::chunk_text;
pub use document::title::extract_title;
pub use document::{extract, Converters, ExtractedText, ExtractionError};
pub use embedding::{create_embedder, Embedder, EmbeddingError};
pub use pipeline::{PipelineError, UploadSummary, Uploader};
pub use store::{DocumentStore, MemoryStore, StoreError, SupabaseStore};
