//! Text Extractor — turns an uploaded PDF résumé into plain text.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error extracting text from PDF: document is empty")]
    Empty,

    #[error("Error extracting text from PDF: document has no pages")]
    NoPages,

    #[error("Error extracting text from PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("Error extracting text from PDF: malformed document")]
    Malformed,
}

/// Extracts text page by page and concatenates it, each page followed by a newline.
///
/// A document that cannot be parsed, or that parses to zero pages, is an error.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)?;

    debug!("Extracted {} page(s) from {} byte PDF", pages.len(), bytes.len());
    join_pages(pages)
}

fn join_pages(pages: Vec<String>) -> Result<String, ExtractionError> {
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in &pages {
        text.push_str(page);
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_is_an_error() {
        let err = extract_text_from_pdf(&[]).unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[test]
    fn test_garbage_bytes_is_an_error() {
        let err = extract_text_from_pdf(b"this is certainly not a PDF file").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
        assert!(err.to_string().starts_with("Error extracting text from PDF"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_zero_pages_is_an_error() {
        let err = join_pages(Vec::new()).unwrap_err();
        assert!(matches!(err, ExtractionError::NoPages));
    }

    #[test]
    fn test_pages_are_joined_in_order_with_newlines() {
        let text = join_pages(vec!["Jane Doe".to_string(), "Experience".to_string()]).unwrap();
        assert_eq!(text, "Jane Doe\nExperience\n");
    }

    #[test]
    fn test_blank_page_still_contributes_separator() {
        let text = join_pages(vec![String::new(), "Skills".to_string()]).unwrap();
        assert_eq!(text, "\nSkills\n");
    }
}
