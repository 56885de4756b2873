//! Section segmentation.
//!
//! Outline entries delimit sections: section i covers the pages from its
//! own entry up to the page before the next entry (the last entry runs to
//! the end of the document). Page text in that range is concatenated,
//! whitespace-collapsed, and truncated to the refined-text cap.

use crate::error::Result;
use crate::model::{OutlineEntry, Section};
use crate::outline::collapse_whitespace;
use crate::source::DocumentSource;

/// Options for section segmentation.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Maximum length of a section's refined text, in characters.
    pub refined_text_cap: usize,
}

impl SegmentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refined-text cap.
    pub fn with_refined_text_cap(mut self, cap: usize) -> Self {
        self.refined_text_cap = cap;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        // 500 characters keeps the refined text a summary rather than a
        // transcript; large enough for the re-ranker's input window.
        Self {
            refined_text_cap: 500,
        }
    }
}

/// Slice a document's text into per-section blocks along outline
/// boundaries.
///
/// A document with an empty outline yields no sections. Page-text failures
/// inside a section's range are skipped rather than aborting the document.
pub fn segment_sections<S: DocumentSource>(
    source: &S,
    document: &str,
    outline: &[OutlineEntry],
    options: &SegmentOptions,
) -> Result<Vec<Section>> {
    let last_page = source.page_count();
    let mut sections = Vec::with_capacity(outline.len());

    for (i, entry) in outline.iter().enumerate() {
        let start = entry.page;
        let end = outline
            .get(i + 1)
            .map(|next| next.page.saturating_sub(1).max(start))
            .unwrap_or(last_page);

        let mut text = String::new();
        for page in start..=end.min(last_page) {
            match source.page_text(page) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push(' ');
                }
                Err(e) => {
                    log::warn!("{}: failed to read text of page {}: {}", document, page, e);
                }
            }
        }

        let mut refined = collapse_whitespace(&text);
        truncate_chars(&mut refined, options.refined_text_cap);

        sections.push(Section::new(
            document,
            entry.text.clone(),
            refined,
            entry.page,
            entry.level,
        ));
    }

    Ok(sections)
}

/// Truncate a string to at most `cap` characters on a char boundary.
fn truncate_chars(text: &mut String, cap: usize) {
    if let Some((idx, _)) = text.char_indices().nth(cap) {
        text.truncate(idx);
    }
}
