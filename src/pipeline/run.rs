// End-to-end corpus run: raw file -> normalized records -> counts file ->
// topic estimator -> JSON artifact.
//
// Every file for one run is named after the input file and the topic count,
// e.g. `loans.tsv.50.counts.txt`, so runs with different topic counts can
// share directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::normalize::{normalize_corpus, NormalizeStats};
use crate::config::Config;
use crate::estimator::stoplist::{default_stop_words, write_stop_list};
use crate::estimator::traits::{AnalysisFiles, EstimationRequest, TopicEstimator};
use crate::ingest::reader::{read_raw_file, Corpus};
use crate::ingest::schema::RecordSchema;
use crate::langid::traits::LanguageIdentifier;
use crate::normalize::counts::write_counts_file;
use crate::normalize::Normalizer;
use crate::packager::artifact::{process, MergeReport};
use crate::packager::readers::{
    read_id_list, read_topic_probabilities, read_topic_summary, write_id_list,
};

/// What to run on.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub schema: RecordSchema,
    pub output_dir: PathBuf,
}

/// Paths written by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub counts_file: PathBuf,
    pub id_list: PathBuf,
    pub artifact: PathBuf,
}

impl RunPaths {
    pub fn new(config: &Config, options: &RunOptions) -> Self {
        let prefix = file_prefix(&options.input);
        let k = config.num_topics;
        Self {
            counts_file: config.temp_dir.join(format!("{prefix}.{k}.counts.txt")),
            id_list: options.output_dir.join(format!("{prefix}.{k}.ids.txt")),
            artifact: options.output_dir.join(format!("{prefix}.{k}.topics.json")),
        }
    }
}

/// Base name of the input file, used to prefix every output.
pub fn file_prefix(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}

/// Result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub corpus: Corpus,
    pub stats: NormalizeStats,
    pub paths: RunPaths,
    /// Documents written to the counts file
    pub counted_documents: usize,
    /// Estimator outputs, when the estimator ran
    pub analysis: Option<AnalysisFiles>,
    pub merge: Option<MergeReport>,
}

fn ensure_dir(dir: &Path, what: &str) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {what} {}", dir.display()))
}

/// Read, normalize, and write the counts file and id list. Stops short of
/// the estimator.
pub fn prepare(
    config: &Config,
    options: &RunOptions,
    normalizer: &Normalizer,
    identifier: &dyn LanguageIdentifier,
) -> Result<RunOutcome> {
    ensure_dir(&options.output_dir, "output directory")?;
    ensure_dir(&config.temp_dir, "temp directory")?;

    let mut corpus = read_raw_file(&options.input, options.schema)?;
    let stats = normalize_corpus(
        &mut corpus,
        normalizer,
        identifier,
        Some(config.lang_filter.as_str()),
    )?;

    let paths = RunPaths::new(config, options);
    let ids = write_counts_file(&corpus.records, &paths.counts_file)?;
    write_id_list(&paths.id_list, &ids)?;
    info!(
        documents = ids.len(),
        counts_file = %paths.counts_file.display(),
        id_list = %paths.id_list.display(),
        "Wrote counts file"
    );

    Ok(RunOutcome {
        corpus,
        stats,
        paths,
        counted_documents: ids.len(),
        analysis: None,
        merge: None,
    })
}

/// Resolve the stop list: the configured file, or the built-in English
/// list written into the temp directory.
pub fn resolve_stop_list(config: &Config) -> Result<PathBuf> {
    config.require_stop_list()?;
    match &config.stop_list {
        Some(path) => Ok(path.clone()),
        None => {
            let path = config.temp_dir.join("stop_list_en.txt");
            write_stop_list(&path, &default_stop_words())?;
            Ok(path)
        }
    }
}

/// Full run including topic estimation and packaging.
pub fn run(
    config: &Config,
    options: &RunOptions,
    normalizer: &Normalizer,
    identifier: &dyn LanguageIdentifier,
    estimator: &dyn TopicEstimator,
) -> Result<RunOutcome> {
    let mut outcome = prepare(config, options, normalizer, identifier)?;
    if outcome.counted_documents == 0 {
        warn!(
            language = %config.lang_filter,
            "No documents with counts; skipping topic estimation"
        );
        return Ok(outcome);
    }

    let request = EstimationRequest {
        counts_file: outcome.paths.counts_file.clone(),
        stop_list: resolve_stop_list(config)?,
        cutoffs: config.cutoffs,
        num_topics: config.num_topics,
    };
    let model = estimator
        .estimate(&request)
        .context("topic estimation failed")?;
    let analysis = estimator
        .analyze(&model)
        .context("topic analysis failed")?;

    let ids = read_id_list(&outcome.paths.id_list)?;
    let topics = read_topic_summary(&analysis.summary_file)?;
    let probabilities = read_topic_probabilities(&analysis.probability_file)?;
    let report = process(&ids, &topics, &probabilities, &outcome.paths.artifact)?;

    outcome.analysis = Some(analysis);
    outcome.merge = Some(report);
    Ok(outcome)
}
