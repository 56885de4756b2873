//! Outline construction from classified spans.

use std::collections::HashSet;

use crate::model::{DocumentStats, OutlineEntry, TextSpan};

use super::classifier::HeadingClassifier;

/// Minimum font size for a title candidate.
const TITLE_MIN_FONT_SIZE: f32 = 14.0;

/// Fallback title when no candidate span exists.
const UNTITLED: &str = "Untitled";

/// Build an ordered, deduplicated outline from spans in reading order.
///
/// Each span is classified with the immediately preceding span as spacing
/// context, whether or not that span was itself a heading. A span whose
/// text already appeared verbatim in this document's outline is skipped:
/// first occurrence wins. Running headers and footers repeat on every page
/// and would otherwise flood the outline.
pub fn build_outline(
    classifier: &HeadingClassifier,
    spans: &[TextSpan],
    stats: &DocumentStats,
) -> Vec<OutlineEntry> {
    let mut outline = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut prev: Option<&TextSpan> = None;

    for span in spans {
        if classifier.is_heading(span, stats, prev) && seen.insert(span.text.as_str()) {
            outline.push(OutlineEntry {
                level: classifier.determine_level(span, stats),
                text: span.text.clone(),
                page: span.page,
            });
        }
        prev = Some(span);
    }

    outline
}

/// Extract the document title: the first span on page 1 whose font size
/// exceeds 14pt and whose bold flag is set. Returns "Untitled" when no
/// such span exists.
pub fn extract_title(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .find(|s| s.page == 1 && s.font_size > TITLE_MIN_FONT_SIZE && s.is_bold)
        .map(|s| s.text.clone())
        .unwrap_or_else(|| UNTITLED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingLevel};

    fn span(text: &str, font_size: f32, font: &str, y0: f32, page: u32) -> TextSpan {
        TextSpan::new(
            text.to_string(),
            font_size,
            font,
            BoundingBox::new(50.0, y0, 300.0, y0 + font_size),
            page,
        )
    }

    fn classifier() -> HeadingClassifier {
        HeadingClassifier::with_defaults()
    }

    #[test]
    fn test_outline_never_exceeds_span_count() {
        let spans = vec![
            span("1. Introduction", 16.0, "Helvetica-Bold", 200.0, 1),
            span("body text goes on and on about the introduction topic here", 10.0, "Helvetica", 260.0, 1),
            span("2. Methods", 16.0, "Helvetica-Bold", 400.0, 1),
        ];
        let stats = DocumentStats::from_spans(&spans);
        let outline = build_outline(&classifier(), &spans, &stats);
        assert!(outline.len() <= spans.len());
    }

    #[test]
    fn test_duplicate_headings_first_occurrence_wins() {
        let spans = vec![
            span("1. Introduction", 16.0, "Helvetica-Bold", 200.0, 1),
            span("1. Introduction", 16.0, "Helvetica-Bold", 60.0, 2),
            span("filler body content to keep the average font size honest", 10.0, "Helvetica", 300.0, 2),
        ];
        let stats = DocumentStats::from_spans(&spans);
        let outline = build_outline(&classifier(), &spans, &stats);

        let texts: Vec<&str> = outline.iter().map(|e| e.text.as_str()).collect();
        let unique: HashSet<&&str> = texts.iter().collect();
        assert_eq!(texts.len(), unique.len());
        assert_eq!(outline[0].page, 1);
    }

    #[test]
    fn test_empty_document_yields_empty_outline_and_untitled() {
        let spans: Vec<TextSpan> = vec![];
        let stats = DocumentStats::from_spans(&spans);
        assert!(build_outline(&classifier(), &spans, &stats).is_empty());
        assert_eq!(extract_title(&spans), "Untitled");
    }

    #[test]
    fn test_single_page_scenario() {
        // Title span (20pt bold), one heading (16pt bold, "1. Introduction"),
        // one body span (10pt).
        let spans = vec![
            span("Annual Report", 20.0, "Helvetica-Bold", 50.0, 1),
            span("1. Introduction", 16.0, "Helvetica-Bold", 200.0, 1),
            span("The quick brown fox jumps over the lazy dog near the riverbank today", 10.0, "Helvetica", 260.0, 1),
        ];
        let stats = DocumentStats::from_spans(&spans);

        assert_eq!(extract_title(&spans), "Annual Report");

        let outline = build_outline(&classifier(), &spans, &stats);
        let intro: Vec<_> = outline
            .iter()
            .filter(|e| e.text == "1. Introduction")
            .collect();
        assert_eq!(intro.len(), 1);
        assert_eq!(intro[0].page, 1);
        // Level follows the font-size ratio against the document average.
        let c = classifier();
        assert_eq!(intro[0].level, c.determine_level(&spans[1], &stats));
        assert!(matches!(
            intro[0].level,
            HeadingLevel::H2 | HeadingLevel::H3
        ));
        // The body span never makes it into the outline.
        assert!(outline.iter().all(|e| !e.text.starts_with("The quick")));
    }

    #[test]
    fn test_title_requires_bold_and_size() {
        // Large but not bold
        let spans = vec![span("Big But Regular", 20.0, "Helvetica", 50.0, 1)];
        assert_eq!(extract_title(&spans), "Untitled");

        // Bold but too small
        let spans = vec![span("Small Bold", 12.0, "Helvetica-Bold", 50.0, 1)];
        assert_eq!(extract_title(&spans), "Untitled");

        // Qualifies only on page 1
        let spans = vec![span("Late Title", 20.0, "Helvetica-Bold", 50.0, 2)];
        assert_eq!(extract_title(&spans), "Untitled");
    }

    #[test]
    fn test_previous_span_context_is_unconditional() {
        // The gap rule compares against the immediately prior span even when
        // that span was body text.
        let body = span("ordinary body paragraph text keeps flowing along here", 10.0, "Helvetica", 300.0, 1);
        let candidate = span("Standalone Line", 12.0, "Helvetica-Bold", 360.0, 1);
        let spans = vec![body.clone(), candidate.clone()];
        let stats = DocumentStats::from_spans(&spans);

        let c = classifier();
        let with_ctx = c.score(&candidate, &stats, Some(&body));
        let without_ctx = c.score(&candidate, &stats, None);
        assert!(with_ctx > without_ctx);
    }
}
