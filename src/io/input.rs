use std::path::Path;

use lopdf::Document;
use tracing::{debug, info};

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{Page, pages_from_texts};

/// Page separator in pre-extracted text files
pub const FORM_FEED: char = '\x0C';

/// Source of per-page document text
pub trait DocumentReader {
    fn read_pages(&self, path: &Path) -> TranscriptResult<Vec<Page>>;
}

/// Reads page text out of PDF files
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfDocumentReader;

impl DocumentReader for PdfDocumentReader {
    fn read_pages(&self, path: &Path) -> TranscriptResult<Vec<Page>> {
        ensure_file(path)?;

        let doc = Document::load(path)
            .map_err(|e| TranscriptError::not_found(path, format!("failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for (number, page_number) in doc.get_pages().into_keys().enumerate() {
            let text = doc.extract_text(&[page_number]).map_err(|e| {
                TranscriptError::not_found(
                    path,
                    format!("failed to extract text from page {}: {}", page_number, e),
                )
            })?;
            debug!("Page {}: {} chars", number, text.len());
            pages.push(Page::new(number, text));
        }

        info!("Read {} pages from {:?}", pages.len(), path);
        Ok(pages)
    }
}

/// Reads text files whose pages are separated by form feeds
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDocumentReader;

impl DocumentReader for TextDocumentReader {
    fn read_pages(&self, path: &Path) -> TranscriptResult<Vec<Page>> {
        ensure_file(path)?;

        let content = std::fs::read_to_string(path)
            .map_err(|e| TranscriptError::not_found(path, e.to_string()))?;
        let pages = parse_text_pages(&content);

        info!("Read {} pages from {:?}", pages.len(), path);
        Ok(pages)
    }
}

/// Split form-feed separated text into pages
pub fn parse_text_pages(content: &str) -> Vec<Page> {
    let content = content.strip_suffix(FORM_FEED).unwrap_or(content);
    pages_from_texts(content.split(FORM_FEED))
}

/// Picks a reader from the file extension: `.pdf` or anything else as text
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDocumentReader;

impl DocumentReader for AutoDocumentReader {
    fn read_pages(&self, path: &Path) -> TranscriptResult<Vec<Page>> {
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            PdfDocumentReader.read_pages(path)
        } else {
            TextDocumentReader.read_pages(path)
        }
    }
}

fn ensure_file(path: &Path) -> TranscriptResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(TranscriptError::not_found(path, "no such file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_pages() {
        let pages = parse_text_pages("Cover\x0CRoster\x0CModerator: Hi.\x0C");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].text, "Cover");
        assert_eq!(pages[2].number, 2);
        assert_eq!(pages[2].text, "Moderator: Hi.");
    }

    #[test]
    fn test_text_reader_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme_2025Q1.txt");
        std::fs::write(&path, "Cover\x0CRoster\x0CHeader\nModerator: Hi.").unwrap();

        let pages = AutoDocumentReader.read_pages(&path).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].text, "Roster");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = PdfDocumentReader
            .read_pages(&dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(err.is_not_found());

        let err = TextDocumentReader
            .read_pages(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unreadable_pdf_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "not a pdf").unwrap();

        let err = AutoDocumentReader.read_pages(&path).unwrap_err();
        assert!(err.is_not_found());
    }
}
