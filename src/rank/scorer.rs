//! Two-stage hybrid relevance scoring.
//!
//! Per document: short sections are zeroed out, the rest are scored
//! lexically (BM25) against the persona/job query, the lexical top-N are
//! re-scored by the cross-encoder, scores are scattered back by original
//! index, a length sweet-spot penalty is applied, and the vector is
//! max-normalized. Any internal failure degrades the whole document to
//! zeros; scoring never aborts the batch.

use regex::Regex;

use crate::error::Result;

use super::lexical::{bm25_scores, tokenize, Bm25Params};
use super::rerank::SectionScorer;

/// Options for relevance scoring.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Sections shorter than this many words score zero outright.
    pub min_section_words: usize,
    /// Number of lexical candidates forwarded to the cross-encoder.
    pub rerank_top_n: usize,
    /// Inclusive word-count range left unpenalized.
    pub sweet_spot: (usize, usize),
    /// Multiplier applied outside the sweet spot.
    pub length_penalty: f32,
    /// BM25 parameters for the lexical stage.
    pub bm25: Bm25Params,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_section_words: 20,
            rerank_top_n: 50,
            sweet_spot: (50, 500),
            length_penalty: 0.8,
            bm25: Bm25Params::default(),
        }
    }
}

impl RankOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum section word count.
    pub fn with_min_section_words(mut self, words: usize) -> Self {
        self.min_section_words = words;
        self
    }

    /// Set the re-rank candidate count.
    pub fn with_rerank_top_n(mut self, n: usize) -> Self {
        self.rerank_top_n = n;
        self
    }
}

/// Relevance scorer for one collection run.
///
/// Holds the query-independent machinery; the neural scorer is injected so
/// tests can run with a stub.
pub struct RelevanceScorer<'a> {
    scorer: &'a dyn SectionScorer,
    options: RankOptions,
    fallback_splitter: Regex,
}

impl<'a> RelevanceScorer<'a> {
    /// Create a scorer around a neural backend.
    pub fn new(scorer: &'a dyn SectionScorer, options: RankOptions) -> Self {
        Self {
            scorer,
            options,
            // Static pattern, known valid.
            fallback_splitter: Regex::new(r"\w+").unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Score one document's candidate section texts against the query.
    ///
    /// The output always has exactly one score per input text. On any
    /// internal failure the document degrades to an all-zero vector.
    pub fn score_document(&self, query: &str, texts: &[&str]) -> Vec<f32> {
        match self.try_score(query, texts) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("scoring failed, zeroing document: {}", e);
                vec![0.0; texts.len()]
            }
        }
    }

    fn try_score(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        let mut scores = vec![0.0f32; texts.len()];
        if texts.is_empty() {
            return Ok(scores);
        }

        // Step 1: drop short sections outright.
        let candidates: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| word_count(t) >= self.options.min_section_words)
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return Ok(scores);
        }

        // Step 2: tokenize query and candidates.
        let query_terms = self.tokenize_terms(query);
        let candidate_terms: Vec<Vec<String>> = candidates
            .iter()
            .map(|&i| self.tokenize_terms(texts[i]))
            .collect();

        // Step 3: lexical scores over the candidate set.
        let lexical = bm25_scores(&query_terms, &candidate_terms, self.options.bm25);

        // Step 4: pick the lexical top-N.
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            lexical[b]
                .partial_cmp(&lexical[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(self.options.rerank_top_n);

        // Step 5: cross-encoder logits for the top-N, squashed to (0, 1).
        let top_texts: Vec<&str> = order.iter().map(|&k| texts[candidates[k]]).collect();
        let logits = self.scorer.score_pairs(query, &top_texts)?;

        // Step 6: scatter back by original index; everything else stays 0.
        for (&k, &logit) in order.iter().zip(&logits) {
            scores[candidates[k]] = sigmoid(logit);
        }

        // Step 7: length sweet-spot penalty.
        let (lo, hi) = self.options.sweet_spot;
        for (i, text) in texts.iter().enumerate() {
            let words = word_count(text);
            if words < lo || words > hi {
                scores[i] *= self.options.length_penalty;
            }
        }

        // Step 8: normalize by the document maximum.
        let max = scores.iter().cloned().fold(0.0f32, f32::max);
        let divisor = if max > 0.0 { max } else { 1.0 };
        for score in &mut scores {
            *score /= divisor;
        }

        Ok(scores)
    }

    /// Lowercase word tokenization with a regex fallback for inputs the
    /// primary tokenizer yields nothing for.
    fn tokenize_terms(&self, text: &str) -> Vec<String> {
        let terms = tokenize(text);
        if !terms.is_empty() || text.trim().is_empty() {
            return terms;
        }
        self.fallback_splitter
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Logistic sigmoid.
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
