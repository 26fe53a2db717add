//! Tests for discovery, per-file preparation and the upload loop.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use amanah_core::{DocId, ScoredDocument};
use async_trait::async_trait;

use super::*;
use crate::store::{DocumentStore, StoreError};

fn small_options() -> ProcessingOptions {
    ProcessingOptions {
        min_chunk_size: 1,
        ..ProcessingOptions::default()
    }
}

const ARTICLES: &str = "1-modda. Ism.\nMatn1\n\n2-modda. Familiya.\nMatn2";

// ── Discovery ───────────────────────────────────────────────────────

#[test]
fn discovers_supported_files_recursively_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    fs::write(dir.path().join("a.PDF"), "a").unwrap();
    fs::write(dir.path().join("nested/c.docx"), "c").unwrap();
    fs::write(dir.path().join("notes.xlsx"), "x").unwrap();

    let files = discover_files(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PDF", "b.txt", "nested/c.docx"]);
}

#[test]
fn folder_without_supported_files_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.md"), "# hi").unwrap();
    assert!(matches!(
        discover_files(dir.path()),
        Err(PipelineError::NoSupportedFiles(_))
    ));
}

#[test]
fn missing_folder_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover_files(&dir.path().join("absent")).is_err());
}

#[test]
fn supported_extensions() {
    assert!(is_supported(Path::new("law.TXT")));
    assert!(is_supported(Path::new("std.pdf")));
    assert!(is_supported(Path::new("a/b.docx")));
    assert!(!is_supported(Path::new("old.doc")));
    assert!(!is_supported(Path::new("Makefile")));
}

// ── Chunking ────────────────────────────────────────────────────────

#[test]
fn chunks_are_tagged_with_their_source() {
    let chunks = chunk_document(ARTICLES, "kodeks.txt", &small_options()).unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.source_file.as_deref() == Some("kodeks.txt")));
}

#[test]
fn empty_text_reports_no_chunks() {
    let err = chunk_document("", "empty.txt", &ProcessingOptions::default()).unwrap_err();
    match err {
        PipelineError::NoChunksProduced { document } => assert_eq!(document, "empty.txt"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_options_are_refused() {
    let options = ProcessingOptions {
        chunk_size: 100,
        overlap: 100,
        ..ProcessingOptions::default()
    };
    assert!(matches!(
        chunk_document(ARTICLES, "x.txt", &options),
        Err(PipelineError::InvalidOptions(_))
    ));
}

#[test]
fn failing_files_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let empty = dir.path().join("empty.txt");
    let missing = dir.path().join("missing.txt");
    fs::write(&good, ARTICLES).unwrap();
    fs::write(&empty, "").unwrap();

    let batch = prepare_files(
        &[empty.clone(), missing.clone(), good.clone()],
        &Converters::default(),
        &small_options(),
    )
    .unwrap();

    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.documents[0].source_label, "good.txt");
    assert_eq!(batch.chunk_count(), 2);
    assert_eq!(batch.chunks().count(), 2);

    assert_eq!(batch.failures.len(), 2);
    assert!(matches!(batch.failures[0].1, PipelineError::NoChunksProduced { .. }));
    assert!(matches!(
        batch.failures[1].1,
        PipelineError::Extraction(ExtractionError::Io(_))
    ));
}

// ── Upload loop ─────────────────────────────────────────────────────

/// Fails titles containing "bad" always and "flaky" on the first attempt.
#[derive(Default)]
struct ScriptedStore {
    calls: AtomicUsize,
    flaky_seen: Mutex<bool>,
    stored: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn insert(&self, title: &str, _content: &str) -> Result<DocId, StoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if title.contains("bad") {
            return Err(StoreError::Upload {
                status: 500,
                body: "boom".into(),
            });
        }
        if title.contains("flaky") {
            let mut seen = self.flaky_seen.lock().unwrap();
            if !*seen {
                *seen = true;
                return Err(StoreError::Upload {
                    status: 503,
                    body: "busy".into(),
                });
            }
        }
        self.stored.lock().unwrap().push(title.to_string());
        Ok(format!("id-{n}"))
    }

    async fn search(&self, _q: &[f32], _t: f32, _l: usize) -> Result<Vec<ScoredDocument>, StoreError> {
        Ok(Vec::new())
    }

    fn embedding_model(&self) -> Option<&str> {
        None
    }
}

fn chunks(titles: &[&str]) -> Vec<Chunk> {
    titles.iter().map(|t| Chunk::new(*t, "content")).collect()
}

#[tokio::test]
async fn upload_tallies_partial_failures_and_continues() {
    let store = Arc::new(ScriptedStore::default());
    let uploader = Uploader::new(store.clone(), Duration::ZERO, 0);
    let owned = chunks(&["one", "bad", "three"]);
    let refs: Vec<&Chunk> = owned.iter().collect();

    let mut events = Vec::new();
    let summary = uploader
        .upload(&refs, |e| {
            events.push(match e {
                UploadEvent::Uploaded { index, total, .. } => format!("ok {index}/{total}"),
                UploadEvent::Failed { index, total, .. } => format!("err {index}/{total}"),
            })
        })
        .await;

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].0, "bad");
    assert!(summary.failures[0].1.contains("500"));
    assert_eq!(events, vec!["ok 1/3", "err 2/3", "ok 3/3"]);
    assert_eq!(*store.stored.lock().unwrap(), vec!["one", "three"]);
}

#[tokio::test]
async fn retries_use_the_configured_budget() {
    let store = Arc::new(ScriptedStore::default());
    let owned = chunks(&["flaky", "bad"]);
    let refs: Vec<&Chunk> = owned.iter().collect();

    let summary = Uploader::new(store.clone(), Duration::ZERO, 2)
        .upload(&refs, |_| {})
        .await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed(), 1);
    // flaky: 2 attempts, bad: 1 + 2 retries.
    assert_eq!(store.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn uploads_are_spaced_by_the_fixed_delay() {
    let store = Arc::new(ScriptedStore::default());
    let owned = chunks(&["a", "b", "c"]);
    let refs: Vec<&Chunk> = owned.iter().collect();

    let started = tokio::time::Instant::now();
    let summary = Uploader::new(store, Duration::from_millis(300), 0)
        .upload(&refs, |_| {})
        .await;

    assert!(summary.all_succeeded());
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn nothing_to_upload() {
    let uploader = Uploader::new(Arc::new(ScriptedStore::default()), Duration::ZERO, 0);
    let summary = uploader.upload(&[], |_| {}).await;
    assert_eq!(summary, UploadSummary::default());
}
