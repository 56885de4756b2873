//! # outrank
//!
//! Structured outline extraction and persona-driven section ranking for
//! PDF documents.
//!
//! The library does two things. In outline mode it reads a PDF, classifies
//! text spans as headings with a weighted rule set, and emits a document
//! title plus an H1/H2/H3 outline. In collection mode it processes a batch
//! of PDFs against a persona and a job to be done, slices each document
//! into sections along its outline, scores the sections with a hybrid
//! BM25-plus-cross-encoder pipeline, and merges everything into one
//! globally ranked result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use outrank::extract_outline;
//!
//! fn main() -> outrank::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", outline.title);
//!     for entry in &outline.outline {
//!         println!("{:?} {} (p.{})", entry.level, entry.text, entry.page);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading detection**: Additive font, layout, and pattern rules
//! - **Section ranking**: BM25 retrieval plus an ONNX cross-encoder
//! - **CJK support**: NFKC normalization and CJK structural markers
//! - **Parallel processing**: Rayon across documents in a collection
//! - **Fault isolation**: One bad document never fails the batch

pub mod error;
pub mod model;
pub mod outline;
pub mod output;
pub mod pipeline;
pub mod rank;
pub mod segment;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    CollectionConfig, CollectionOutput, DocumentOutline, DocumentStats, HeadingLevel,
    OutlineEntry, Section, TextSpan,
};
pub use outline::{build_outline, ClassifierConfig, HeadingClassifier};
pub use output::JsonFormat;
pub use pipeline::{
    load_config, process_collection, run_collection, CollectionResult, DocumentReport,
    DocumentStatus, PipelineOptions,
};
pub use rank::{RankOptions, RankerOptions, RelevanceScorer, SectionScorer};
pub use segment::{segment_sections, SegmentOptions};
pub use source::{DocumentSource, LopdfSource};

use std::path::Path;

/// Extract the title and heading outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use outrank::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("{} headings", outline.outline.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    let source = LopdfSource::open(path.as_ref())?;
    extract_outline_from(&source)
}

/// Extract the outline of a PDF file with a custom classifier
/// configuration.
pub fn extract_outline_with_config<P: AsRef<Path>>(
    path: P,
    config: ClassifierConfig,
) -> Result<DocumentOutline> {
    let source = LopdfSource::open(path.as_ref())?;
    extract_outline_with(&source, config)
}

/// Extract the outline from an already opened document source.
pub fn extract_outline_from<S: DocumentSource>(source: &S) -> Result<DocumentOutline> {
    extract_outline_with(source, ClassifierConfig::default())
}

/// Extract the outline with a custom classifier configuration.
///
/// ```no_run
/// use outrank::{extract_outline_with, ClassifierConfig, LopdfSource};
///
/// let source = LopdfSource::open("document.pdf").unwrap();
/// let config = ClassifierConfig::new().with_threshold(8);
/// let outline = extract_outline_with(&source, config).unwrap();
/// ```
pub fn extract_outline_with<S: DocumentSource>(
    source: &S,
    config: ClassifierConfig,
) -> Result<DocumentOutline> {
    let classifier = HeadingClassifier::new(config)?;
    let spans = source.all_spans()?;
    let stats = DocumentStats::from_spans(&spans);
    Ok(DocumentOutline {
        title: outline::extract_title(&spans),
        outline: build_outline(&classifier, &spans, &stats),
    })
}
