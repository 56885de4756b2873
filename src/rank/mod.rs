//! Persona-driven section ranking.
//!
//! Three layers: a lexical BM25 pass over each document's sections, a
//! neural cross-encoder re-rank of the lexical top candidates, and a
//! collection-wide merge that assigns final importance ranks.

pub mod lexical;
pub mod ranker;
pub mod rerank;
pub mod scorer;

pub use lexical::{bm25_scores, tokenize, Bm25Params};
pub use ranker::{rank_collection, RankerOptions, SCORE_THRESHOLD};
pub use rerank::{default_model_dir, OnnxCrossEncoder, SectionScorer};
pub use scorer::{RankOptions, RelevanceScorer};
