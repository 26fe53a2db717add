//! Line-oriented detection of articles, chapters and headed sections.
//!
//! Legal and standards texts number their parts inconsistently, so each line
//! is classified independently against a list of permissive patterns instead
//! of being parsed with a grammar.

use std::sync::LazyLock;

use regex::Regex;

/// Heading lines at or above this many chars are treated as body text.
pub const MAX_HEADING_CHARS: usize = 200;
/// Sub-section lines at or above this many chars are plain body text.
pub const MAX_SUBSECTION_CHARS: usize = 150;
/// Title of the section synthesized for text preceding the first heading.
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// What kind of line opened a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// No heading: leading text before any heading.
    Introduction,
    /// Markdown `#` heading.
    Heading,
    /// Numbered article (`12-modda.`, `Article 12`).
    Article,
    /// Chapter, part or section marker (`Chapter IV`, `2-bob`).
    Chapter,
    /// Numbered top-level heading (`3. Scope of the Standard`).
    Numbered,
    /// All-caps label ending in a colon (`DEFINITIONS:`).
    Label,
}

/// A contiguous span of the source text forming one logical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralSection {
    pub level: u8,
    pub kind: SectionKind,
    pub title: String,
    /// Title of the closest chapter heading above this section, if any.
    pub chapter: Option<String>,
    /// Body lines (trimmed, blank lines skipped) joined with `\n`.
    pub content: String,
    /// Byte offset where the span starts.
    pub start_offset: usize,
    /// Byte offset one past the span end.
    pub end_offset: usize,
}

/// Classification of a single non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Heading { kind: SectionKind, level: u8, title: String },
    SubSection,
    Body,
}

struct HeadingPattern {
    regex: Regex,
    kind: SectionKind,
    level: u8,
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("structure patterns are valid regex literals")
}

static HEADING_PATTERNS: LazyLock<Vec<HeadingPattern>> = LazyLock::new(|| {
    vec![
        HeadingPattern {
            regex: pattern(r"^#{1,3}\s+(.+?)\s*#*$"),
            kind: SectionKind::Heading,
            level: 1,
        },
        HeadingPattern {
            regex: pattern(r"(?i)^(\d+\s*[-.]?\s*modda\b.*)$"),
            kind: SectionKind::Article,
            level: 2,
        },
        HeadingPattern {
            regex: pattern(
                r"(?i)^(article\s+\d+[a-z]*(?:\s*[-–:.]\s*[^.!?;]*\.?|(?:\s+[^\s.!?;]+){0,5}))$",
            ),
            kind: SectionKind::Article,
            level: 2,
        },
        HeadingPattern {
            regex: pattern(r"(?i)^((?:chapter|part|section)\s+(?:\d+|[ivxlc]+|[a-z])\b.*)$"),
            kind: SectionKind::Chapter,
            level: 1,
        },
        HeadingPattern {
            regex: pattern(r"(?i)^((?:\d+|[ivxlc]+)\s*[-.]?\s*(?:bob|qism|bo['‘’`]?lim)\b.*)$"),
            kind: SectionKind::Chapter,
            level: 1,
        },
        HeadingPattern {
            regex: pattern(r"^(\d{1,2}\.\s+\p{Lu}[^.!?;:]*)$"),
            kind: SectionKind::Numbered,
            level: 2,
        },
        HeadingPattern {
            regex: pattern(r"^(\p{Lu}[\p{Lu}\d\s'’&,/()-]*\p{Lu})\s*:$"),
            kind: SectionKind::Label,
            level: 2,
        },
    ]
});

static SUBSECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        pattern(r"^\d+(?:[./]\d+)+\.?\s+\S"),
        pattern(r"^\(?[a-z]\)\s+\S"),
        pattern(r"^\(\d+\)\s+\S"),
        pattern(r"^\d+\)\s+\S"),
    ]
});

/// Classify one trimmed, non-blank line.
pub fn classify_line(line: &str) -> LineClass {
    let chars = line.chars().count();

    if chars < MAX_HEADING_CHARS {
        for p in HEADING_PATTERNS.iter() {
            if let Some(caps) = p.regex.captures(line) {
                let title = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
                if title.is_empty() {
                    continue;
                }
                let level = if p.kind == SectionKind::Heading {
                    line.chars().take_while(|c| *c == '#').count() as u8
                } else {
                    p.level
                };
                return LineClass::Heading { kind: p.kind, level, title };
            }
        }
    }

    if chars < MAX_SUBSECTION_CHARS && SUBSECTION_PATTERNS.iter().any(|re| re.is_match(line)) {
        return LineClass::SubSection;
    }

    LineClass::Body
}

struct OpenSection<'a> {
    level: u8,
    kind: SectionKind,
    title: String,
    chapter: Option<String>,
    start: usize,
    lines: Vec<&'a str>,
}

/// Partition `text` into structural sections in encounter order.
///
/// Spans cover the whole input: the first section starts at 0, each section
/// ends where the next begins and the last ends at `text.len()`. Headings
/// without body lines are dropped and their span folds into a neighbour.
/// A chapter heading stays attached to every later section as `chapter`
/// until the next chapter heading, even when it has no body of its own.
pub fn parse_sections(text: &str) -> Vec<StructuralSection> {
    let mut closed: Vec<OpenSection<'_>> = Vec::new();
    let mut current: Option<OpenSection<'_>> = None;
    let mut chapter: Option<String> = None;
    let mut offset = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();

        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            LineClass::Heading { kind, level, title } => {
                if let Some(open) = current.take() {
                    closed.push(open);
                }
                let section_chapter = if kind == SectionKind::Chapter {
                    chapter = Some(title.clone());
                    None
                } else {
                    chapter.clone()
                };
                current = Some(OpenSection {
                    level,
                    kind,
                    title,
                    chapter: section_chapter,
                    start: line_start,
                    lines: Vec::new(),
                });
            }
            LineClass::SubSection | LineClass::Body => {
                current
                    .get_or_insert_with(|| OpenSection {
                        level: 1,
                        kind: SectionKind::Introduction,
                        title: INTRODUCTION_TITLE.to_string(),
                        chapter: None,
                        start: line_start,
                        lines: Vec::new(),
                    })
                    .lines
                    .push(line);
            }
        }
    }
    if let Some(open) = current.take() {
        closed.push(open);
    }

    let kept: Vec<OpenSection<'_>> = closed.into_iter().filter(|s| !s.lines.is_empty()).collect();

    let starts: Vec<usize> = kept
        .iter()
        .enumerate()
        .map(|(i, s)| if i == 0 { 0 } else { s.start })
        .collect();

    kept.into_iter()
        .enumerate()
        .map(|(i, s)| StructuralSection {
            level: s.level,
            kind: s.kind,
            title: s.title,
            chapter: s.chapter,
            content: s.lines.join("\n"),
            start_offset: starts[i],
            end_offset: starts.get(i + 1).copied().unwrap_or(text.len()),
        })
        .collect()
}
