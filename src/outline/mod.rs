//! Outline extraction: span normalization, heading classification, and
//! outline/title construction.

mod builder;
mod classifier;
mod normalize;

pub use builder::{build_outline, extract_title};
pub use classifier::{ClassifierConfig, HeadingClassifier, RuleHit, RuleWeights};
pub use normalize::{collapse_whitespace, normalize_text};
