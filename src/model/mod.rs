//! Core data model.

mod collection;
mod outline;
mod section;
mod span;
mod stats;

pub use collection::{
    ChallengeInfo, CollectionConfig, CollectionOutput, DocumentRef, ExtractedSection, JobToBeDone,
    Metadata, Persona, SubsectionAnalysis,
};
pub use outline::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use section::Section;
pub use span::{BoundingBox, TextSpan};
pub use stats::DocumentStats;
