//! Outline types: heading levels, entries, and per-document outlines.

use serde::{Deserialize, Serialize};

/// Heading level in the extracted outline.
///
/// Levels are ordered from coarsest (`H1`) to finest (`H3`); the derived
/// `Ord` follows declaration order, so `H1 < H2 < H3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

/// A single heading in document reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: String,
    /// Page the heading appears on (1-indexed)
    pub page: u32,
}

/// Outline-mode output for one document: title plus ordered headings.
///
/// Entries are in document reading order and contain no duplicate texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Document title ("Untitled" when no title span is found)
    pub title: String,
    /// Ordered heading entries
    pub outline: Vec<OutlineEntry>,
}
