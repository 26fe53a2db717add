//! External converter processes (pandoc, pdftotext, mutool).

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use amanah_core::config::IngestConfig;
use tracing::debug;

use super::ExtractionError;

/// Placeholder replaced by the input file path in converter arguments.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// A converter program plus its argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ConverterCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Run the converter on `input` and return its stdout as text.
    ///
    /// `Command::output` waits for the child and drains both pipes, so nothing
    /// is left running whether the call succeeds or fails.
    pub fn run(&self, input: &Path) -> Result<String, ExtractionError> {
        let input = input.to_string_lossy();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(INPUT_PLACEHOLDER, &input))
            .collect();

        debug!(program = %self.program, ?args, "running converter");

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            let message = if e.kind() == ErrorKind::NotFound {
                format!("'{}' not found on PATH", self.program)
            } else {
                format!("failed to start '{}': {e}", self.program)
            };
            ExtractionError::Conversion {
                tool: self.program.clone(),
                message,
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ExtractionError::Conversion {
                tool: self.program.clone(),
                message,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The converter set used by the text extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converters {
    pub docx: ConverterCommand,
    pub pdf_primary: ConverterCommand,
    /// Layout-preserving extractor tried when the primary fails.
    pub pdf_fallback: ConverterCommand,
}

impl Default for Converters {
    fn default() -> Self {
        Self::with_programs("pandoc", "pdftotext", "mutool")
    }
}

impl Converters {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::with_programs(&config.pandoc_path, &config.pdftotext_path, &config.mutool_path)
    }

    fn with_programs(pandoc: &str, pdftotext: &str, mutool: &str) -> Self {
        Self {
            docx: ConverterCommand::new(pandoc, &["-t", "plain", "--wrap=none", INPUT_PLACEHOLDER]),
            pdf_primary: ConverterCommand::new(pdftotext, &["-enc", "UTF-8", INPUT_PLACEHOLDER, "-"]),
            pdf_fallback: ConverterCommand::new(
                mutool,
                &["draw", "-q", "-F", "txt", "-o", "-", INPUT_PLACEHOLDER],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_conversion_error() {
        let cmd = ConverterCommand::new("amanah-no-such-converter", &[INPUT_PLACEHOLDER]);
        let err = cmd.run(Path::new("x.docx")).unwrap_err();
        match err {
            ExtractionError::Conversion { tool, message } => {
                assert_eq!(tool, "amanah-no-such-converter");
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn placeholder_is_substituted() {
        let cmd = ConverterCommand::new("echo", &["converted", INPUT_PLACEHOLDER]);
        let out = cmd.run(Path::new("/tmp/law.docx")).unwrap();
        assert_eq!(out.trim(), "converted /tmp/law.docx");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_surfaces_stderr() {
        let cmd = ConverterCommand::new("sh", &["-c", "echo 'bad input' >&2; exit 3"]);
        let err = cmd.run(Path::new("x.pdf")).unwrap_err();
        match err {
            ExtractionError::Conversion { message, .. } => assert_eq!(message, "bad input"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn config_overrides_program_paths() {
        let mut config = amanah_core::Config::for_profile("AMNTESTCONV").ingest;
        config.pandoc_path = "/opt/pandoc".into();
        let converters = Converters::from_config(&config);
        assert_eq!(converters.docx.program, "/opt/pandoc");
        assert!(converters.docx.args.contains(&INPUT_PLACEHOLDER.to_string()));
    }
}
