use std::path::Path;

use super::{Converters, ExtractionError};

/// Convert a .docx file to plain text with the configured document converter.
pub fn extract_docx(path: &Path, converters: &Converters) -> Result<String, ExtractionError> {
    converters.docx.run(path)
}
