//! PDF document source abstraction.
//!
//! The outline and segmentation core never touches a PDF library directly;
//! it consumes the narrow [`DocumentSource`] capability surface, so tests
//! drive the pipeline with an in-memory fake.

mod lopdf_source;

pub use lopdf_source::LopdfSource;

use crate::error::Result;
use crate::model::TextSpan;

/// Narrow capability interface over an opened PDF document.
pub trait DocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Normalized text spans of one page (1-indexed), in reading order.
    fn page_spans(&self, page: u32) -> Result<Vec<TextSpan>>;

    /// Full plain text of one page (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;

    /// All spans of the document in reading order (page order, then
    /// within-page order as produced by `page_spans`).
    fn all_spans(&self) -> Result<Vec<TextSpan>> {
        let mut spans = Vec::new();
        for page in 1..=self.page_count() {
            spans.extend(self.page_spans(page)?);
        }
        Ok(spans)
    }
}
