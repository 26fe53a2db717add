use std::path::Path;

use tracing::{info, warn};

use super::{Converters, ExtractionError};

/// Extract PDF text: primary converter first, layout-preserving fallback second.
pub fn extract_pdf(path: &Path, converters: &Converters) -> Result<String, ExtractionError> {
    let primary_err = match converters.pdf_primary.run(path) {
        Ok(text) => return Ok(text),
        Err(e) => e,
    };

    warn!(
        file = %path.display(),
        error = %primary_err,
        fallback = %converters.pdf_fallback.program,
        "primary PDF extraction failed, trying fallback"
    );

    match converters.pdf_fallback.run(path) {
        Ok(text) => {
            info!(file = %path.display(), "PDF text extracted via fallback converter");
            Ok(text)
        }
        Err(fallback_err) => Err(ExtractionError::Conversion {
            tool: format!(
                "{} / {}",
                converters.pdf_primary.program, converters.pdf_fallback.program
            ),
            message: format!("{primary_err}; {fallback_err}"),
        }),
    }
}
