//! Corpus-wide font-size statistics.

use super::TextSpan;

/// Default average font size when a document has no valid font sizes.
const FALLBACK_AVG_FONT_SIZE: f32 = 10.0;

/// Font-size statistics for one document, used as adaptive thresholds by
/// the heading classifier. Derived once per document, consumed read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    /// Mean font size over spans with a positive font size
    pub avg_font_size: f32,
    /// Standard deviation of those font sizes
    pub font_size_std: f32,
}

impl DocumentStats {
    /// Compute statistics over a document's spans.
    ///
    /// Spans with non-positive font sizes are ignored. A document with no
    /// valid font sizes falls back to an average of 10.0; a single valid
    /// size yields a standard deviation of 0.0.
    pub fn from_spans(spans: &[TextSpan]) -> Self {
        let sizes: Vec<f32> = spans
            .iter()
            .map(|s| s.font_size)
            .filter(|&size| size > 0.0)
            .collect();

        if sizes.is_empty() {
            return Self {
                avg_font_size: FALLBACK_AVG_FONT_SIZE,
                font_size_std: 0.0,
            };
        }

        let avg = sizes.iter().sum::<f32>() / sizes.len() as f32;
        let std = if sizes.len() > 1 {
            // Sample standard deviation, matching the adaptive threshold's
            // intent of measuring spread rather than population variance.
            let variance = sizes.iter().map(|s| (s - avg).powi(2)).sum::<f32>()
                / (sizes.len() - 1) as f32;
            variance.sqrt()
        } else {
            0.0
        };

        Self {
            avg_font_size: avg,
            font_size_std: std,
        }
    }
}

impl Default for DocumentStats {
    fn default() -> Self {
        Self {
            avg_font_size: FALLBACK_AVG_FONT_SIZE,
            font_size_std: 0.0,
        }
    }
}
