//! Size-bounded, title-tagged chunking of extracted documents.
//!
//! Documents with a recognisable structure are chunked section by section,
//! splitting oversized sections at numbered paragraphs or word boundaries.
//! Everything else goes through a paragraph-accumulating fallback with a
//! character overlap between neighbouring chunks.

mod helpers;
mod strategies;

use amanah_core::{Chunk, ProcessingOptions};

use super::structure::parse_sections;

pub use helpers::{split_by_words, split_numbered_paragraphs, NumberedParagraph};
pub use strategies::{chunk_paragraphs, chunk_structured, structure_is_reliable, MIN_PARAGRAPH_CHARS};

/// Chunk `text` using the structured path when the parsed structure is
/// reliable, the paragraph fallback otherwise.
///
/// Options are assumed valid; callers validate them first.
pub fn chunk_text(text: &str, options: &ProcessingOptions) -> Vec<Chunk> {
    let sections = parse_sections(text);
    if structure_is_reliable(&sections) {
        tracing::debug!(sections = sections.len(), "chunking along document structure");
        chunk_structured(&sections, options)
    } else {
        tracing::debug!(sections = sections.len(), "structure unreliable, chunking by paragraphs");
        chunk_paragraphs(text, options)
    }
}
