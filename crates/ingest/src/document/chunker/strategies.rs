//! Chunking strategies: structured (section-aware) and paragraph fallback.

use std::sync::LazyLock;

use amanah_core::{Chunk, ProcessingOptions};
use regex::Regex;

use super::helpers::{char_len, split_by_words, split_numbered_paragraphs, tail_chars};
use crate::document::structure::{SectionKind, StructuralSection};
use crate::document::title::extract_title;

/// Paragraphs shorter than this (trimmed) are page furniture, not content.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Sections needed before generic structure is trusted.
const RELIABLE_SECTION_COUNT: usize = 3;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break is a valid regex literal"));

/// Whether parsed sections describe the document well enough to chunk by.
///
/// More than three sections always qualify. Two or more sections qualify when
/// every one of them was opened by an explicit article marker; a leading
/// introduction (typically the document title) is not counted.
pub fn structure_is_reliable(sections: &[StructuralSection]) -> bool {
    if sections.len() > RELIABLE_SECTION_COUNT {
        return true;
    }
    let counted = match sections.first() {
        Some(first) if first.kind == SectionKind::Introduction => &sections[1..],
        _ => sections,
    };
    counted.len() >= 2 && counted.iter().all(|s| s.kind == SectionKind::Article)
}

/// Emits chunks for one section. The chapter line, when present, heads the
/// content of every chunk and counts against `chunk_size`.
struct SectionWriter<'a> {
    options: &'a ProcessingOptions,
    lead: String,
    budget: usize,
}

impl<'a> SectionWriter<'a> {
    fn new(section: &StructuralSection, options: &'a ProcessingOptions) -> Self {
        let lead = section
            .chapter
            .as_ref()
            .map(|chapter| format!("{chapter}\n\n"))
            .unwrap_or_default();
        let budget = options.chunk_size.saturating_sub(char_len(&lead)).max(1);
        Self { options, lead, budget }
    }

    fn fits(&self, text: &str) -> bool {
        char_len(text) <= self.budget
    }

    /// Bodies below `min_chunk_size` are dropped.
    fn push(&self, chunks: &mut Vec<Chunk>, title: String, body: &str) {
        if char_len(body) >= self.options.min_chunk_size {
            chunks.push(Chunk::new(title, format!("{}{body}", self.lead)));
        }
    }

    fn push_word_parts(&self, chunks: &mut Vec<Chunk>, title: &str, text: &str) {
        for (i, part) in split_by_words(text, self.budget, self.options.overlap_words)
            .into_iter()
            .enumerate()
        {
            self.push(chunks, format!("{title} - Part {}", i + 1), &part);
        }
    }
}

fn push_chunk(chunks: &mut Vec<Chunk>, title: String, content: String, options: &ProcessingOptions) {
    if char_len(&content) >= options.min_chunk_size {
        chunks.push(Chunk::new(title, content));
    }
}

// ── Structured path ─────────────────────────────────────────────────

/// One chunk per section, splitting sections larger than `chunk_size`.
pub fn chunk_structured(sections: &[StructuralSection], options: &ProcessingOptions) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for section in sections {
        let base = format!("{} - {}", options.title_prefix, section.title);
        let writer = SectionWriter::new(section, options);

        if writer.fits(&section.content) {
            writer.push(&mut chunks, base, &section.content);
            continue;
        }

        let paragraphs = split_numbered_paragraphs(&section.content);
        let marked = paragraphs.iter().filter(|p| p.marker.is_some()).count();

        if marked < 2 {
            writer.push_word_parts(&mut chunks, &base, &section.content);
            continue;
        }

        for paragraph in paragraphs {
            let title = match &paragraph.marker {
                Some(marker) => format!("{base} - {marker}"),
                None => base.clone(),
            };
            if writer.fits(&paragraph.text) {
                writer.push(&mut chunks, title, &paragraph.text);
            } else {
                writer.push_word_parts(&mut chunks, &title, &paragraph.text);
            }
        }
    }

    chunks
}

// ── Fallback path ───────────────────────────────────────────────────

fn fallback_title(content: &str, emitted: usize, options: &ProcessingOptions) -> String {
    match extract_title(content) {
        Some(title) => format!("{} - {title}", options.title_prefix),
        None => format!("{} - Chapter {}", options.title_prefix, emitted + 1),
    }
}

fn flush_paragraph_chunk(chunks: &mut Vec<Chunk>, content: String, options: &ProcessingOptions) {
    let title = fallback_title(&content, chunks.len(), options);
    push_chunk(chunks, title, content, options);
}

/// Accumulate blank-line separated paragraphs into chunks of at most
/// `chunk_size` chars, seeding each chunk with the previous one's tail.
///
/// Content is left untrimmed so the overlap tail of a chunk is an exact
/// prefix of the chunk it seeded.
pub fn chunk_paragraphs(text: &str, options: &ProcessingOptions) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    let paragraphs = PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| char_len(p) >= MIN_PARAGRAPH_CHARS);

    for paragraph in paragraphs {
        if current.is_empty() {
            current.push_str(paragraph);
            continue;
        }

        let paragraph_len = char_len(paragraph);
        if char_len(&current) + 2 + paragraph_len <= options.chunk_size {
            current.push_str("\n\n");
            current.push_str(paragraph);
            continue;
        }

        let tail = tail_chars(&current, options.overlap).to_string();
        flush_paragraph_chunk(&mut chunks, std::mem::take(&mut current), options);

        if !tail.is_empty() && char_len(&tail) + 2 + paragraph_len <= options.chunk_size {
            current.push_str(&tail);
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        flush_paragraph_chunk(&mut chunks, current, options);
    }
    chunks
}
