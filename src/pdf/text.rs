// src/pdf/text.rs
use std::path::Path;

use crate::utils::error::PdfError;

/// Extracts the text of every page of a report PDF as one newline-joined
/// string. Pages without extractable text contribute an empty line, so the
/// page count is preserved in the output. Extraction failure is fatal for
/// the document and propagated to the caller; no retry is attempted here.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String, PdfError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PdfError::InputNotFound(path.display().to_string()));
    }

    tracing::info!("Extracting text from {}", path.display());
    let pages = pdf_extract::extract_text_by_pages(path)?;
    let text = pages.join("\n");
    tracing::debug!(
        "Extracted {} page(s), {} chars from {}",
        pages.len(),
        text.len(),
        path.display()
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_reported() {
        let err = extract_text("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, PdfError::InputNotFound(_)));
    }
}
