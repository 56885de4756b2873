//! Collection processing pipeline.
//!
//! Drives a whole collection run: load the input config, verify the model
//! assets up front, extract and segment every document in parallel, score
//! sections against the persona query, and merge everything into one
//! globally ranked output. A failing document is reported and contributes
//! nothing; it never aborts the batch.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{CollectionConfig, CollectionOutput, DocumentStats, Section};
use crate::outline::{build_outline, ClassifierConfig, HeadingClassifier};
use crate::rank::{
    rank_collection, OnnxCrossEncoder, RankOptions, RankerOptions, RelevanceScorer, SectionScorer,
};
use crate::segment::{segment_sections, SegmentOptions};
use crate::source::{DocumentSource, LopdfSource};

/// Options for a collection run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory holding the cross-encoder model and tokenizer.
    pub model_dir: PathBuf,
    /// Heading classifier configuration (threshold, weights, cutpoints).
    pub classifier: ClassifierConfig,
    /// Section segmentation options.
    pub segment: SegmentOptions,
    /// Per-document relevance scoring options.
    pub rank: RankOptions,
    /// Collection-level ranking options.
    pub ranker: RankerOptions,
}

impl PipelineOptions {
    /// Create options with defaults and the given model directory.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            classifier: ClassifierConfig::default(),
            segment: SegmentOptions::default(),
            rank: RankOptions::default(),
            ranker: RankerOptions::default(),
        }
    }

    /// Set the classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Outcome of processing one input document.
#[derive(Debug, Clone)]
pub enum DocumentStatus {
    /// Extraction succeeded with this many sections.
    Processed { sections: usize },
    /// The document was skipped; the rest of the batch continued.
    Failed { reason: String },
}

/// Per-document processing report for the batch.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub filename: String,
    pub status: DocumentStatus,
}

/// Result of a full collection run.
#[derive(Debug, Clone)]
pub struct CollectionResult {
    pub output: CollectionOutput,
    pub reports: Vec<DocumentReport>,
}

/// Load a collection input config from a JSON file.
pub fn load_config(path: &Path) -> Result<CollectionConfig> {
    let file = File::open(path)?;
    let config = serde_json::from_reader(BufReader::new(file))?;
    Ok(config)
}

/// Run the full pipeline for one collection directory.
///
/// The model is loaded before any document is touched; missing model
/// assets fail the whole run immediately.
pub fn run_collection(
    input_dir: &Path,
    config: &CollectionConfig,
    options: &PipelineOptions,
) -> Result<CollectionResult> {
    let encoder = OnnxCrossEncoder::from_dir(&options.model_dir)?;
    process_collection(input_dir, config, Arc::new(encoder), options)
}

/// Run the pipeline with an injected scorer backend.
pub fn process_collection(
    input_dir: &Path,
    config: &CollectionConfig,
    scorer: Arc<dyn SectionScorer>,
    options: &PipelineOptions,
) -> Result<CollectionResult> {
    let query = config.query();
    let classifier = HeadingClassifier::new(options.classifier.clone())?;
    let relevance = RelevanceScorer::new(scorer.as_ref(), options.rank.clone());

    log::info!(
        "processing {} documents with query: {}",
        config.documents.len(),
        query
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads())
        .build()
        .map_err(|e| Error::Config(format!("thread pool: {}", e)))?;

    let results: Vec<(DocumentReport, Vec<Section>)> = pool.install(|| {
        config
            .documents
            .par_iter()
            .map(|doc| {
                let path = input_dir.join(&doc.filename);
                match process_document(&path, &doc.filename, &classifier, &relevance, &query, options)
                {
                    Ok(sections) => (
                        DocumentReport {
                            filename: doc.filename.clone(),
                            status: DocumentStatus::Processed {
                                sections: sections.len(),
                            },
                        },
                        sections,
                    ),
                    Err(e) => {
                        log::warn!("skipping {}: {}", doc.filename, e);
                        (
                            DocumentReport {
                                filename: doc.filename.clone(),
                                status: DocumentStatus::Failed {
                                    reason: e.to_string(),
                                },
                            },
                            vec![],
                        )
                    }
                }
            })
            .collect()
    });

    let mut reports = Vec::with_capacity(results.len());
    let mut sections = Vec::new();
    for (report, mut doc_sections) in results {
        reports.push(report);
        sections.append(&mut doc_sections);
    }

    let ranked = rank_collection(sections, &options.ranker);
    let timestamp = chrono::Utc::now().to_rfc3339();
    let output = CollectionOutput::from_ranked(config, timestamp, &ranked);

    Ok(CollectionResult { output, reports })
}

/// Extract, segment, and score one document.
fn process_document(
    path: &Path,
    filename: &str,
    classifier: &HeadingClassifier,
    relevance: &RelevanceScorer<'_>,
    query: &str,
    options: &PipelineOptions,
) -> Result<Vec<Section>> {
    let source = LopdfSource::open(path)?;
    let spans = source.all_spans()?;
    let stats = DocumentStats::from_spans(&spans);

    let outline = build_outline(classifier, &spans, &stats);
    let mut sections = segment_sections(&source, filename, &outline, &options.segment)?;

    let texts: Vec<&str> = sections.iter().map(|s| s.refined_text.as_str()).collect();
    let scores = relevance.score_document(query, &texts);
    for (section, score) in sections.iter_mut().zip(scores) {
        section.raw_score = score;
    }

    log::debug!("{}: {} sections", filename, sections.len());
    Ok(sections)
}

/// Half the logical cores, at least one.
fn worker_threads() -> usize {
    (num_cpus::get() / 2).max(1)
}
