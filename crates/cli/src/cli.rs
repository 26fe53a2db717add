use std::path::PathBuf;

use amanah_core::ProcessingOptions;
use clap::{Args, Parser, Subcommand};

/// Document ingestion and retrieval-augmented answers for Islamic finance.
#[derive(Parser, Debug)]
#[command(name = "amanah", version, about = "Sharia-finance document ingestion and RAG assistant")]
pub struct CliArgs {
    /// Config profile; keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk documents and upload them to the document store
    Ingest(IngestArgs),
    /// Answer a question using retrieved documents as context
    Ask(AskArgs),
    /// Print the active configuration without secrets
    Config,
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Single .txt, .pdf or .docx file to ingest
    #[arg(required_unless_present = "folder", conflicts_with = "folder")]
    pub file: Option<PathBuf>,

    /// Ingest every supported file under this directory
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Upload without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Chunk and preview only; nothing is uploaded
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters carried over between fallback chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Chunks shorter than this are dropped
    #[arg(long)]
    pub min_chunk_size: Option<usize>,

    /// Prefix for structured chunk titles
    #[arg(long)]
    pub title_prefix: Option<String>,

    /// Pause between upload requests, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl IngestArgs {
    /// Apply command-line overrides on top of configured options.
    pub fn processing_options(&self, base: ProcessingOptions) -> ProcessingOptions {
        ProcessingOptions {
            chunk_size: self.chunk_size.unwrap_or(base.chunk_size),
            overlap: self.overlap.unwrap_or(base.overlap),
            min_chunk_size: self.min_chunk_size.unwrap_or(base.min_chunk_size),
            title_prefix: self.title_prefix.clone().unwrap_or(base.title_prefix),
            ..base
        }
    }
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Maximum number of context documents
    #[arg(long)]
    pub match_count: Option<usize>,

    /// Minimum similarity for a document to be used as context
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Also print the retrieved documents
    #[arg(long)]
    pub show_context: bool,

    /// Print the answer as JSON
    #[arg(long)]
    pub json: bool,
}
