//! Collection-level ranking.
//!
//! Scored sections from all documents are merged, thresholded, ordered, and
//! assigned importance ranks. Ranks are dense (1..=K) over the sections that
//! survive the threshold; everything below the threshold stays unranked.

use std::cmp::Ordering;

use crate::model::Section;

/// Minimum normalized score for a section to receive a rank.
pub const SCORE_THRESHOLD: f32 = 0.45;

/// Options for collection ranking.
#[derive(Debug, Clone)]
pub struct RankerOptions {
    /// Sections scoring below this are left unranked.
    pub score_threshold: f32,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self {
            score_threshold: SCORE_THRESHOLD,
        }
    }
}

impl RankerOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score threshold.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }
}

/// Rank sections across the whole collection.
///
/// Sections at or above the threshold are sorted by score descending, with
/// page number ascending as the tiebreak, then given ranks 1..=K. The input
/// order of unranked sections is preserved; ranked sections are moved to
/// the front in rank order.
pub fn rank_collection(mut sections: Vec<Section>, options: &RankerOptions) -> Vec<Section> {
    sections.sort_by(|a, b| compare_for_rank(a, b, options.score_threshold));

    let mut next_rank = 1u32;
    for section in &mut sections {
        if section.raw_score >= options.score_threshold {
            section.final_rank = Some(next_rank);
            next_rank += 1;
        } else {
            section.final_rank = None;
        }
    }

    log::debug!(
        "ranked {} of {} sections",
        next_rank - 1,
        sections.len()
    );
    sections
}

fn compare_for_rank(a: &Section, b: &Section, threshold: f32) -> Ordering {
    let a_ranked = a.raw_score >= threshold;
    let b_ranked = b.raw_score >= threshold;

    // Ranked sections sort before unranked ones.
    match (a_ranked, b_ranked) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => return Ordering::Equal,
        (true, true) => {}
    }

    b.raw_score
        .partial_cmp(&a.raw_score)
        .unwrap_or(Ordering::Equal)
        .then(a.page.cmp(&b.page))
}
