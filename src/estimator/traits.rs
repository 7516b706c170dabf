// Topic estimator trait: swap-ready abstraction.
//
// Estimation is done by an external program. The pipeline only produces
// its input (a counts file and a stop list) and reads its two outputs (a
// ranked topic summary and a document-to-topic matrix), so tests can plug
// in a fake that writes those files directly.

use std::path::PathBuf;

use anyhow::Result;

/// Vocabulary pruning thresholds passed to the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoffs {
    /// Drop terms occurring this many times or fewer.
    pub tf: f64,
    /// Drop terms appearing in more than this fraction of documents.
    pub df: f64,
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self { tf: 3.0, df: 0.25 }
    }
}

/// Everything needed to train one model.
#[derive(Debug, Clone)]
pub struct EstimationRequest {
    pub counts_file: PathBuf,
    pub stop_list: PathBuf,
    pub cutoffs: Cutoffs,
    pub num_topics: u32,
}

/// A trained model on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHandle {
    pub model_file: PathBuf,
    pub num_topics: u32,
}

/// The two analysis outputs the packager consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFiles {
    pub summary_file: PathBuf,
    pub probability_file: PathBuf,
}

/// Trait for training a topic model and analyzing it.
pub trait TopicEstimator {
    /// Train a model from a counts file.
    fn estimate(&self, request: &EstimationRequest) -> Result<ModelHandle>;

    /// Produce the topic summary and per-document probability files.
    fn analyze(&self, model: &ModelHandle) -> Result<AnalysisFiles>;
}
