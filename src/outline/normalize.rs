//! Span text normalization.
//!
//! Raw typeset text arrives with compatibility forms (full-width digits,
//! ligatures) and irregular whitespace. Heading classification and outline
//! deduplication both key on the normalized form, so normalization happens
//! once, at extraction time.

use unicode_normalization::UnicodeNormalization;

/// Normalize raw span text: NFKC unicode normalization followed by
/// whitespace collapse and trimming.
///
/// Returns an empty string for whitespace-only input; callers drop such
/// spans.
pub fn normalize_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    collapse_whitespace(&normalized)
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
