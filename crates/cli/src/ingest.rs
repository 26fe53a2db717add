use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use amanah_core::{Chunk, Config};
use amanah_ingest::pipeline::{discover_files, is_supported, prepare_files, PipelineError};
use amanah_ingest::{Converters, SupabaseStore, Uploader};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::IngestArgs;
use crate::terminal::Terminal;

/// Chunks listed before asking to upload.
const PREVIEW_LIMIT: usize = 20;

/// Files named on the command line, or every supported file under `--folder`.
fn resolve_inputs(args: &IngestArgs) -> Result<Vec<PathBuf>, PipelineError> {
    if let Some(dir) = &args.folder {
        return discover_files(dir);
    }
    let Some(file) = &args.file else {
        return Err(PipelineError::NoSupportedFiles("no input given".into()));
    };
    if !file.is_file() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", file.display()),
        )));
    }
    if !is_supported(file) {
        return Err(PipelineError::NoSupportedFiles(file.display().to_string()));
    }
    Ok(vec![file.clone()])
}

pub async fn run(args: IngestArgs, config: &Config, terminal: &Terminal) -> Result<ExitCode> {
    let options = args.processing_options(config.ingest.processing_options());
    if let Err(e) = options.validate() {
        terminal.print_error(&e.to_string())?;
        return Ok(ExitCode::FAILURE);
    }

    let files = match resolve_inputs(&args) {
        Ok(files) => files,
        Err(e) => {
            terminal.print_error(&e.to_string())?;
            terminal.print_info("Supported formats: .txt, .pdf, .docx")?;
            return Ok(ExitCode::FAILURE);
        }
    };

    terminal.print_banner("document ingestion", config.profile_label())?;
    let converters = Converters::from_config(&config.ingest);
    let batch = prepare_files(&files, &converters, &options)?;

    for doc in &batch.documents {
        terminal.print_document(doc)?;
    }
    for (path, error) in &batch.failures {
        terminal.print_skipped(path, error)?;
    }

    let chunks: Vec<&Chunk> = batch.chunks().collect();
    if chunks.is_empty() {
        terminal.print_error("no chunks were produced")?;
        return Ok(ExitCode::FAILURE);
    }
    terminal.print_preview(&chunks, PREVIEW_LIMIT)?;

    if args.dry_run {
        terminal.print_info("Dry run: nothing was uploaded.")?;
        return Ok(ExitCode::SUCCESS);
    }
    if !args.yes && !terminal.confirm(&format!("Upload {} chunks?", chunks.len()))? {
        terminal.print_info("Upload cancelled.")?;
        return Ok(ExitCode::SUCCESS);
    }

    let store = SupabaseStore::from_config(&config.supabase).context("document store is not configured")?;
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.ingest.upload_delay_ms));
    let uploader = Uploader::new(Arc::new(store), delay, config.ingest.upload_retries);

    info!(chunks = chunks.len(), files = batch.documents.len(), "starting upload");
    let summary = uploader
        .upload(&chunks, |event| {
            if let Err(e) = terminal.print_upload_event(&event) {
                debug!(error = %e, "failed to print upload progress");
            }
        })
        .await;
    terminal.print_summary(&summary)?;

    Ok(ExitCode::SUCCESS)
}
