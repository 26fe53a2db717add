use std::io::{self, Write};
use std::path::Path;

use amanah_core::Chunk;
use amanah_ingest::pipeline::{PreparedDocument, UploadEvent, UploadSummary};
use amanah_llm::{ChatAnswer, CitationKind};
use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const ANSWER: Color = Color::Cyan;
    const CITATION: Color = Color::Yellow;
    const SUCCESS: Color = Color::DarkGreen;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Chunk content shown per preview line.
const PREVIEW_CHARS: usize = 80;

/// Manages terminal output for the ingest and ask commands.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the startup banner.
    pub fn print_banner(&self, task: &str, profile: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("amanah"),
            ResetColor,
            Print(format!(" - {task}\n")),
            SetForegroundColor(Colors::DIM),
            Print(format!("Profile: {profile}\n")),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// One line per successfully chunked file.
    pub fn print_document(&self, doc: &PreparedDocument) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print(format!(
                "📄 {}: {} chars → {} chunks\n",
                doc.source_label,
                doc.char_count,
                doc.chunks.len()
            )),
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_skipped(&self, path: &Path, reason: &dyn std::fmt::Display) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("⚠️  skipped {}: {}\n", path.display(), reason)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Numbered titles with a short content excerpt, at most `limit` lines.
    pub fn print_preview(&self, chunks: &[&Chunk], limit: usize) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::HEADER),
            Print(format!("Preview ({} chunks)\n", chunks.len())),
            ResetColor,
        )?;
        for (i, chunk) in chunks.iter().take(limit).enumerate() {
            execute!(
                stdout,
                Print(format!("{:>4}. {} ", i + 1, chunk.title)),
                SetForegroundColor(Colors::DIM),
                Print(format!(
                    "({} chars) {}\n",
                    chunk.char_len(),
                    excerpt(&chunk.content, PREVIEW_CHARS)
                )),
                ResetColor,
            )?;
        }
        if chunks.len() > limit {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("      ... and {} more\n", chunks.len() - limit)),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Ask a yes/no question; anything but an explicit yes declines.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::PROMPT),
            Print(format!("{question} (y/N) ")),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(is_affirmative(&input))
    }

    pub fn print_upload_event(&self, event: &UploadEvent<'_>) -> Result<()> {
        let mut stdout = io::stdout();
        match event {
            UploadEvent::Uploaded {
                index,
                total,
                title,
                id,
            } => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::SUCCESS),
                    Print(format!("✅ [{index}/{total}] {title}")),
                    SetForegroundColor(Colors::DIM),
                    Print(format!(" (id {id})\n")),
                    ResetColor,
                )?;
            }
            UploadEvent::Failed {
                index,
                total,
                title,
                error,
            } => {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::ERROR),
                    Print(format!("❌ [{index}/{total}] {title}: {error}\n")),
                    ResetColor,
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_summary(&self, summary: &UploadSummary) -> Result<()> {
        let mut stdout = io::stdout();
        let color = if summary.all_succeeded() {
            Colors::SUCCESS
        } else {
            Colors::ERROR
        };
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(color),
            Print(format!(
                "Uploaded {}/{} chunks\n",
                summary.succeeded, summary.attempted
            )),
            ResetColor,
        )?;
        for (title, error) in &summary.failures {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("  - {title}: {error}\n")),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_answer(&self, answer: &ChatAnswer, show_context: bool) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ANSWER),
            Print(&answer.message),
            ResetColor,
            Print("\n"),
        )?;

        if !answer.citations.is_empty() {
            execute!(stdout, Print("\n"), SetForegroundColor(Colors::HEADER), Print("Citations\n"), ResetColor)?;
            for citation in &answer.citations {
                let label = match citation.kind {
                    CitationKind::Quran => "Quran",
                    CitationKind::Hadith => "Hadith",
                };
                execute!(
                    stdout,
                    SetForegroundColor(Colors::CITATION),
                    Print(format!("  [{label}] ")),
                    ResetColor,
                    Print(format!("{}\n", citation.reference)),
                )?;
            }
        }

        if show_context {
            execute!(
                stdout,
                Print("\n"),
                SetForegroundColor(Colors::HEADER),
                Print(format!("Context ({} documents)\n", answer.context_docs.len())),
                ResetColor,
            )?;
            for doc in &answer.context_docs {
                execute!(
                    stdout,
                    Print(format!("  {:.3} {}\n", doc.similarity, doc.title)),
                    SetForegroundColor(Colors::DIM),
                    Print(format!("        {}\n", excerpt(&doc.content, PREVIEW_CHARS))),
                    ResetColor,
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", message)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", message)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// First `max` chars on a single line, with an ellipsis when cut.
fn excerpt(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{cut}…")
}
