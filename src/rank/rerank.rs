//! Neural re-ranking stage.
//!
//! The re-ranker is a pairwise cross-encoder: (query, candidate text) in,
//! one relevance logit out. The model is an opaque pretrained ONNX asset;
//! this module only tokenizes, runs the session, and extracts the logit.
//! The [`SectionScorer`] trait is the seam that lets tests substitute a
//! stub for the real model.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array2;
use ort::{session::Session, value::Value};
use tokenizers::Tokenizer;

use crate::error::{Error, Result};

/// Maximum token length of an encoded (query, candidate) pair.
const PAIR_MAX_LEN: usize = 256;

/// Filename of the exported cross-encoder model.
const MODEL_FILE: &str = "cross-encoder.onnx";

/// Filename of the HuggingFace tokenizer definition.
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Pairwise relevance scoring over candidate section texts.
///
/// Returns one raw logit per input text, in input order. Implementations
/// must be shareable across worker threads.
pub trait SectionScorer: Send + Sync {
    /// Score every candidate text against the query.
    fn score_pairs(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>>;
}

/// ONNX cross-encoder backed by `ort` and the HuggingFace tokenizers.
///
/// The session and tokenizer are loaded once and reused for every document
/// a worker processes; reloading per document would dominate the runtime.
#[derive(Debug)]
pub struct OnnxCrossEncoder {
    // ort sessions take &mut for inference; the lock serializes the neural
    // stage across workers while extraction stays parallel.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl OnnxCrossEncoder {
    /// Load the cross-encoder from a model directory containing
    /// `cross-encoder.onnx` and `tokenizer.json`.
    ///
    /// Missing assets are a startup failure: scoring without the model
    /// would be meaningless, so callers must halt before any document
    /// processing.
    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            return Err(Error::ModelUnavailable(model_path));
        }
        if !tokenizer_path.exists() {
            return Err(Error::ModelUnavailable(tokenizer_path));
        }

        Self::from_files(&model_path, &tokenizer_path)
    }

    /// Load from explicit file paths.
    pub fn from_files(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        log::info!("loading cross-encoder from {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| Error::Scoring(format!("session builder: {}", e)))?
            .with_intra_threads(intra_threads())
            .map_err(|e| Error::Scoring(format!("session threads: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| Error::Scoring(format!("load {}: {}", model_path.display(), e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| Error::Scoring(format!("load tokenizer: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Encode one (query, candidate) pair into model inputs.
    fn encode_pair(&self, query: &str, text: &str) -> Result<(Vec<i64>, Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode((query, text), true)
            .map_err(|e| Error::Scoring(format!("tokenize pair: {}", e)))?;

        let take = encoding.get_ids().len().min(PAIR_MAX_LEN);
        let ids = encoding.get_ids()[..take].iter().map(|&x| x as i64).collect();
        let type_ids = encoding.get_type_ids()[..take]
            .iter()
            .map(|&x| x as i64)
            .collect();
        let mask = vec![1i64; take];
        Ok((ids, type_ids, mask))
    }

    /// Run the session on one encoded pair and return the logit.
    fn run_pair(&self, ids: Vec<i64>, type_ids: Vec<i64>, mask: Vec<i64>) -> Result<f32> {
        let seq_len = ids.len();
        let ids_array = Array2::from_shape_vec((1, seq_len), ids)
            .map_err(|e| Error::Scoring(format!("input shape: {}", e)))?;
        let mask_array = Array2::from_shape_vec((1, seq_len), mask)
            .map_err(|e| Error::Scoring(format!("input shape: {}", e)))?;
        let type_array = Array2::from_shape_vec((1, seq_len), type_ids)
            .map_err(|e| Error::Scoring(format!("input shape: {}", e)))?;

        let input_ids = Value::from_array(ids_array)
            .map_err(|e| Error::Scoring(format!("input tensor: {}", e)))?;
        let attention_mask = Value::from_array(mask_array)
            .map_err(|e| Error::Scoring(format!("input tensor: {}", e)))?;
        let token_type_ids = Value::from_array(type_array)
            .map_err(|e| Error::Scoring(format!("input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Scoring("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![input_ids, attention_mask, token_type_ids])
            .map_err(|e| Error::Scoring(format!("inference: {}", e)))?;

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Scoring(format!("extract logits: {}", e)))?;

        data.first()
            .copied()
            .ok_or_else(|| Error::Scoring("empty logit output".to_string()))
    }
}

impl SectionScorer for OnnxCrossEncoder {
    fn score_pairs(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        let mut logits = Vec::with_capacity(texts.len());
        for text in texts {
            let (ids, type_ids, mask) = self.encode_pair(query, text)?;
            logits.push(self.run_pair(ids, type_ids, mask)?);
        }
        Ok(logits)
    }
}

/// Bounded intra-op thread count for the ONNX session.
fn intra_threads() -> usize {
    (num_cpus::get() / 2).max(1)
}

/// Resolve the default model directory: `$OUTRANK_MODEL_DIR` or
/// `./models`.
pub fn default_model_dir() -> PathBuf {
    std::env::var_os("OUTRANK_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("models"))
}
