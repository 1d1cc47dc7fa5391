use serde::{Deserialize, Serialize};

/// One page of a source document as produced by a document reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 0-based position of the page in the document
    pub number: usize,
    /// Raw extracted text
    pub text: String,
}

impl Page {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Build pages from an ordered list of texts, numbering them from 0
pub fn pages_from_texts<I, S>(texts: I) -> Vec<Page>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(number, text)| Page::new(number, text))
        .collect()
}

/// Transcript body text with the repeating page header removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Concatenated body text, starting with a newline
    pub text: String,
    /// Per-page fragments after prefix removal, in page order
    pub fragments: Vec<String>,
    /// The boilerplate prefix found on the first body page
    pub prefix: String,
}

impl NormalizedDocument {
    pub fn page_count(&self) -> usize {
        self.fragments.len()
    }
}

/// Fixed page layout of a transcript document
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Page holding the management roster (0-based)
    pub roster_page: usize,
    /// First page of the transcript body (0-based)
    pub body_start_page: usize,
    /// Token marking the end of the per-page boilerplate prefix
    pub anchor: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            roster_page: 1,
            body_start_page: 2,
            anchor: "Moderator".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Smallest page count a document may have under this layout
    pub fn min_pages(&self) -> usize {
        self.body_start_page.max(self.roster_page) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_from_texts_numbers_from_zero() {
        let pages = pages_from_texts(["cover", "roster", "body"]);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].number, 0);
        assert_eq!(pages[2].number, 2);
        assert_eq!(pages[1].text, "roster");
    }

    #[test]
    fn test_layout_default() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.roster_page, 1);
        assert_eq!(layout.body_start_page, 2);
        assert_eq!(layout.min_pages(), 3);
    }
}
