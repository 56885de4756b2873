//! Text span types produced by the PDF source layer.

/// Axis-aligned bounding box in page coordinates.
///
/// The origin is the top-left corner of the page: `y0` is the top edge of
/// the span and `y1` the bottom edge, so `y0 < y1` and smaller `y0` means
/// closer to the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A contiguous run of text sharing font and style, the atomic unit of
/// layout extraction. Immutable once extracted.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// Normalized text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
    /// Position on the page (top-origin coordinates)
    pub bbox: BoundingBox,
    /// Page number (1-indexed)
    pub page: u32,
}

impl TextSpan {
    /// Create a new text span, deriving style flags from the font name.
    pub fn new(text: String, font_size: f32, font_name: &str, bbox: BoundingBox, page: u32) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text,
            font_size,
            is_bold,
            is_italic,
            bbox,
            page,
        }
    }

    /// Number of whitespace-separated words in the span.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_italic_from_font_name() {
        let bbox = BoundingBox::default();
        let span = TextSpan::new("Test".to_string(), 12.0, "Helvetica-Bold", bbox, 1);
        assert!(span.is_bold);
        assert!(!span.is_italic);

        let span = TextSpan::new("Test".to_string(), 12.0, "Times-Oblique", bbox, 1);
        assert!(!span.is_bold);
        assert!(span.is_italic);

        let span = TextSpan::new("Test".to_string(), 12.0, "NotoSans-BlackItalic", bbox, 1);
        assert!(span.is_bold);
        assert!(span.is_italic);
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(50.0, 100.0, 250.0, 115.0);
        assert_eq!(bbox.width(), 200.0);
        assert_eq!(bbox.height(), 15.0);
    }

    #[test]
    fn test_word_count() {
        let span = TextSpan::new(
            "1. Introduction to the topic".to_string(),
            12.0,
            "Helvetica",
            BoundingBox::default(),
            1,
        );
        assert_eq!(span.word_count(), 5);
    }
}
