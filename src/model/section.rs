//! Section type: one outline entry's text slice with its ranking state.

use super::HeadingLevel;

/// Text associated with one outline entry, bounded to the next heading or
/// the end of the document.
///
/// Scoring state is split into two fields: `raw_score` holds the normalized
/// relevance score produced per document, and `final_rank` is assigned only
/// during global ranking across the collection. A section without a rank
/// did not survive the relevance threshold.
#[derive(Debug, Clone)]
pub struct Section {
    /// Source document filename
    pub document: String,
    /// Heading text of the owning outline entry
    pub title: String,
    /// Whitespace-collapsed, length-bounded section text
    pub refined_text: String,
    /// Page of the owning outline entry (1-indexed)
    pub page: u32,
    /// Heading level of the owning outline entry
    pub level: HeadingLevel,
    /// Normalized relevance score in [0, 1]
    pub raw_score: f32,
    /// 1-based global importance rank, assigned by the collection ranker
    pub final_rank: Option<u32>,
}

impl Section {
    /// Create an unscored section.
    pub fn new(
        document: impl Into<String>,
        title: impl Into<String>,
        refined_text: impl Into<String>,
        page: u32,
        level: HeadingLevel,
    ) -> Self {
        Self {
            document: document.into(),
            title: title.into(),
            refined_text: refined_text.into(),
            page,
            level,
            raw_score: 0.0,
            final_rank: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section_is_unranked() {
        let section = Section::new("a.pdf", "Intro", "some text", 1, HeadingLevel::H1);
        assert_eq!(section.raw_score, 0.0);
        assert_eq!(section.final_rank, None);
    }
}
