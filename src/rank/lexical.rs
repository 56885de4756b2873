//! Lexical retrieval stage: BM25 scoring of candidates against the query.

/// BM25 parameters.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation (higher weights repeated terms more).
    pub k1: f32,
    /// Document-length normalization (0 = none, 1 = full).
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Score each candidate token list against the query tokens.
///
/// Corpus statistics (document frequency, average length) come from the
/// candidate set itself; candidates are the per-document sections, so the
/// scores are comparable within one document.
pub fn bm25_scores(
    query_terms: &[String],
    candidates: &[Vec<String>],
    params: Bm25Params,
) -> Vec<f32> {
    if candidates.is_empty() {
        return vec![];
    }
    if query_terms.is_empty() {
        return vec![0.0; candidates.len()];
    }

    let n = candidates.len() as f32;
    let avg_dl = candidates.iter().map(|t| t.len()).sum::<usize>() as f32 / n;

    // Document frequency per query term over the candidate set.
    let dfs: Vec<f32> = query_terms
        .iter()
        .map(|term| {
            candidates
                .iter()
                .filter(|tokens| tokens.iter().any(|t| t == term))
                .count() as f32
        })
        .collect();

    candidates
        .iter()
        .map(|tokens| {
            let dl = tokens.len() as f32;
            let mut score = 0.0f32;
            for (term, &df) in query_terms.iter().zip(&dfs) {
                let tf = tokens.iter().filter(|t| *t == term).count() as f32;
                if tf == 0.0 {
                    continue;
                }
                let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
                let tf_norm = (tf * (params.k1 + 1.0))
                    / (tf + params.k1 * (1.0 - params.b + params.b * dl / avg_dl.max(1.0)));
                score += idf * tf_norm;
            }
            score
        })
        .collect()
}

/// Tokenize text into lowercase alphanumeric tokens of length >= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() >= 2)
        .map(|s| s.to_lowercase())
        .collect()
}
