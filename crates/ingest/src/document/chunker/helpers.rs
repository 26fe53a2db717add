//! Splitting utilities shared by the chunking strategies.

use std::sync::LazyLock;

use regex::Regex;

/// Numbered-paragraph markers at line starts: `2/1`, `4.3.1`, `(5)`, `5)`.
static PARAGRAPH_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\d+(?:[./]\d+)+\.?|\(\d+\)|\d+\))\s+")
        .expect("paragraph marker is a valid regex literal")
});

/// Length in chars, the unit every size limit is expressed in.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` chars of `text` (all of it when shorter).
pub(crate) fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// One paragraph of a section split at numbered markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedParagraph {
    /// Marker without a trailing period; `None` for text before the first marker.
    pub marker: Option<String>,
    pub text: String,
}

/// Split `content` into paragraphs starting at numbered markers.
///
/// Each paragraph runs from its marker to the next one. Non-blank text before
/// the first marker is returned first with no marker.
pub fn split_numbered_paragraphs(content: &str) -> Vec<NumberedParagraph> {
    let mut paragraphs = Vec::new();
    let mut markers = PARAGRAPH_MARKER.captures_iter(content).peekable();

    let first_start = markers
        .peek()
        .and_then(|c| c.get(0))
        .map_or(content.len(), |m| m.start());
    let lead = content[..first_start].trim();
    if !lead.is_empty() {
        paragraphs.push(NumberedParagraph {
            marker: None,
            text: lead.to_string(),
        });
    }

    while let Some(caps) = markers.next() {
        let (Some(whole), Some(marker)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = markers
            .peek()
            .and_then(|c| c.get(0))
            .map_or(content.len(), |m| m.start());
        paragraphs.push(NumberedParagraph {
            marker: Some(marker.as_str().trim_end_matches('.').to_string()),
            text: content[whole.start()..end].trim().to_string(),
        });
    }

    paragraphs
}

/// Length of `words` joined with single spaces.
fn joined_len(words: &[&str]) -> usize {
    words.iter().map(|w| char_len(w)).sum::<usize>() + words.len().saturating_sub(1)
}

/// Greedy word accumulation into parts of at most `max_chars`.
///
/// Each new part is seeded with up to `overlap_words` trailing words of the
/// previous part, dropping seed words from the front until the next word fits.
/// A single word longer than `max_chars` becomes a part of its own.
pub fn split_by_words(text: &str, max_chars: usize, overlap_words: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut len = 0usize;

    for word in text.split_whitespace() {
        let word_len = char_len(word);
        if !current.is_empty() && len + 1 + word_len > max_chars {
            parts.push(current.join(" "));

            let keep_from = current.len().saturating_sub(overlap_words);
            let mut seed: Vec<&str> = current.split_off(keep_from);
            while !seed.is_empty() && joined_len(&seed) + 1 + word_len > max_chars {
                seed.remove(0);
            }
            current = seed;
            len = joined_len(&current);
        }

        len = if current.is_empty() { word_len } else { len + 1 + word_len };
        current.push(word);
    }

    if !current.is_empty() {
        parts.push(current.join(" "));
    }
    parts
}
