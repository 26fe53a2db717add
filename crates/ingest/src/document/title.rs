//! Heuristic titles for chunks that carry no structural label.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

/// Only this many leading non-blank lines are examined.
const TITLE_SCAN_LINES: usize = 3;
/// Accepted length of a pattern-derived title, in chars.
const PATTERN_TITLE_CHARS: RangeInclusive<usize> = 6..=119;
/// Accepted length of a bare first line used as a title, in chars.
const FIRST_LINE_TITLE_CHARS: RangeInclusive<usize> = 11..=99;

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Standards-body citation: "AAOIFI Shari'ah Standard No. 8", "IFSB-10".
        r"(?i)\b((?:AAOIFI|IFSB)[\s-]+(?:Shari['’]?ah?\s+)?(?:Standard\s*)?(?:No\.?\s*)?\(?\d+\)?.*)$",
        // Numbered-paragraph code: "2/1 Definition of murabaha".
        r"^(\d+(?:/\d+)+\.?\s+\S.*)$",
        // Article marker.
        r"(?i)^((?:\d+\s*[-.]?\s*modda|article\s+\d+[a-z]?)\b.*)$",
        // Markdown heading.
        r"^(#{1,6}\s+.+)$",
        // Named sections.
        r"(?i)^((?:introduction|scope|definitions?|preface|conclusion|applicable\s+to|concept\s+paper|statement\s+of\s+the\s+standard)\b.*)$",
        // Generic chapter / part markers.
        r"(?i)^((?:chapter|part|section)\s+(?:\d+|[ivxlc]+|[a-z])\b.*|[IVX]+\.\s+.+|\d+\.\s+\p{L}.*)$",
    ]
    .iter()
    .map(|re| Regex::new(re).expect("title patterns are valid regex literals"))
    .collect()
});

/// Derive a title from the first few non-blank lines of `text`.
///
/// Patterns are tried in priority order over the scanned lines; a match whose
/// trimmed capture falls outside the accepted length is skipped. Without a
/// usable match the first line itself is used when its length is reasonable.
pub fn extract_title(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(TITLE_SCAN_LINES)
        .collect();
    let first = *lines.first()?;

    for re in TITLE_PATTERNS.iter() {
        for line in &lines {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            let title = caps
                .get(1)
                .map_or("", |m| m.as_str())
                .trim_start_matches('#')
                .trim();
            if PATTERN_TITLE_CHARS.contains(&title.chars().count()) {
                return Some(title.to_string());
            }
        }
    }

    if FIRST_LINE_TITLE_CHARS.contains(&first.chars().count()) {
        return Some(first.to_string());
    }
    None
}
