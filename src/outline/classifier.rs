//! Heuristic heading classification.
//!
//! Each span is scored against an ordered list of named, weighted rules;
//! a span is a heading when the additive score reaches the decision
//! threshold. Rules are independent: several can fire on the same span.
//! Weights and the threshold live in [`ClassifierConfig`] so the
//! precision/recall tradeoff is tunable without code changes.

use regex::Regex;

use crate::error::Result;
use crate::model::{DocumentStats, HeadingLevel, TextSpan};

/// Weights for the individual classifier rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleWeights {
    /// Font size exceeds avg + k·std
    pub large_font: i32,
    /// Bold style flag
    pub bold: i32,
    /// Italic style flag
    pub italic: i32,
    /// Word count within the heading range
    pub short_text: i32,
    /// Text matches a structural pattern
    pub structural_pattern: i32,
    /// Uppercase-character ratio above the cutoff
    pub uppercase: i32,
    /// Vertical position near the top of the page
    pub near_page_top: i32,
    /// Vertical gap from the previous span's bottom edge
    pub gap_above: i32,
    /// Bounding box narrower than the isolated-line cutoff
    pub narrow_line: i32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            large_font: 3,
            bold: 3,
            italic: 1,
            short_text: 1,
            structural_pattern: 4,
            uppercase: 2,
            near_page_top: 2,
            gap_above: 3,
            narrow_line: 1,
        }
    }
}

/// Configuration for the heading classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Minimum additive score for a span to count as a heading
    pub decision_threshold: i32,
    /// Sensitivity k in the font-size rule `size > avg + k·std`
    pub size_sensitivity: f32,
    /// Inclusive word-count range for the short-text rule
    pub heading_words: (usize, usize),
    /// Uppercase-character ratio cutoff
    pub uppercase_ratio: f32,
    /// Page-top rule fires when the span's top edge is above this y
    pub page_top_y: f32,
    /// Gap rule fires when the gap to the previous span exceeds this
    pub spacing_gap: f32,
    /// Narrow-line rule fires when the span is narrower than this
    pub narrow_line_width: f32,
    /// Font-size ratio cutpoint for H1
    pub h1_ratio: f32,
    /// Font-size ratio cutpoint for H2
    pub h2_ratio: f32,
    /// Rule weights
    pub weights: RuleWeights,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            decision_threshold: 6,
            size_sensitivity: 1.0,
            heading_words: (1, 12),
            uppercase_ratio: 0.5,
            page_top_y: 150.0,
            spacing_gap: 30.0,
            narrow_line_width: 300.0,
            h1_ratio: 1.6,
            h2_ratio: 1.3,
            weights: RuleWeights::default(),
        }
    }
}

impl ClassifierConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decision threshold.
    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.decision_threshold = threshold;
        self
    }

    /// Set the font-size sensitivity k.
    pub fn with_sensitivity(mut self, k: f32) -> Self {
        self.size_sensitivity = k;
        self
    }

    /// Set the rule weights.
    pub fn with_weights(mut self, weights: RuleWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// A rule that fired during classification, with its contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleHit {
    /// Rule name, stable for logging and tests
    pub name: &'static str,
    /// Score contribution
    pub weight: i32,
}

/// Heuristic heading classifier.
///
/// Deterministic: the same span, stats, and previous-span context always
/// produce the same score and decision.
pub struct HeadingClassifier {
    config: ClassifierConfig,
    patterns: Vec<Regex>,
}

impl HeadingClassifier {
    /// Create a classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        // Structural heading patterns: numbered ("1." / "1.1"), lettered
        // ("A."), chapter/section keywords (EN/JP), Roman numerals, and
        // well-known section names (EN/JP).
        let patterns = [
            r"^\d+\.?\d*\s",
            r"^[A-Z]\.\s",
            r"(?i)^(chapter|section)\b",
            r"^(部|章|第)",
            r"^[IVX]+\.\s",
            r"(?i)^(abstract|introduction)\b",
            r"^(結論|概要)",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::error::Error::Parse(format!("invalid heading pattern: {}", e)))?;

        Ok(Self { config, patterns })
    }

    /// Create a classifier with default configuration.
    pub fn with_defaults() -> Self {
        // The built-in patterns are static and known-valid.
        Self::new(ClassifierConfig::default()).unwrap_or_else(|_| unreachable!())
    }

    /// The classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Evaluate every rule against a span and return the ones that fired,
    /// in rule order.
    pub fn evaluate(
        &self,
        span: &TextSpan,
        stats: &DocumentStats,
        prev: Option<&TextSpan>,
    ) -> Vec<RuleHit> {
        let c = &self.config;
        let w = &c.weights;
        let mut hits = Vec::new();
        let mut hit = |fired: bool, name: &'static str, weight: i32| {
            if fired {
                hits.push(RuleHit { name, weight });
            }
        };

        let size_cutoff = stats.avg_font_size + c.size_sensitivity * stats.font_size_std;
        hit(span.font_size > size_cutoff, "large_font", w.large_font);
        hit(span.is_bold, "bold", w.bold);
        hit(span.is_italic, "italic", w.italic);

        let words = span.word_count();
        hit(
            words >= c.heading_words.0 && words <= c.heading_words.1,
            "short_text",
            w.short_text,
        );
        hit(
            self.patterns.iter().any(|p| p.is_match(&span.text)),
            "structural_pattern",
            w.structural_pattern,
        );
        hit(
            uppercase_ratio(&span.text) > c.uppercase_ratio,
            "uppercase",
            w.uppercase,
        );

        hit(span.bbox.y0 < c.page_top_y, "near_page_top", w.near_page_top);
        let gap_fired = prev
            .map(|p| span.bbox.y0 - p.bbox.y1 > c.spacing_gap)
            .unwrap_or(false);
        hit(gap_fired, "gap_above", w.gap_above);
        hit(
            span.bbox.width() < c.narrow_line_width,
            "narrow_line",
            w.narrow_line,
        );

        hits
    }

    /// Total additive score for a span.
    pub fn score(&self, span: &TextSpan, stats: &DocumentStats, prev: Option<&TextSpan>) -> i32 {
        self.evaluate(span, stats, prev).iter().map(|h| h.weight).sum()
    }

    /// Whether a span is a heading.
    pub fn is_heading(
        &self,
        span: &TextSpan,
        stats: &DocumentStats,
        prev: Option<&TextSpan>,
    ) -> bool {
        self.score(span, stats, prev) >= self.config.decision_threshold
    }

    /// Assign a heading level from the span's font-size ratio to the
    /// document average. Monotonic in the ratio; at an exact cutpoint the
    /// coarser level wins.
    pub fn determine_level(&self, span: &TextSpan, stats: &DocumentStats) -> HeadingLevel {
        let avg = if stats.avg_font_size > 0.0 {
            stats.avg_font_size
        } else {
            1.0
        };
        let ratio = span.font_size / avg;
        if ratio >= self.config.h1_ratio {
            HeadingLevel::H1
        } else if ratio >= self.config.h2_ratio {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        }
    }
}

/// Ratio of uppercase characters over all characters of the text.
fn uppercase_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f32 / total as f32
}
