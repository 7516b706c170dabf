// Batch packaging over a data directory laid out as
//
//   <corpus>_list.txt
//   summary_<corpus>_<k>topics.txt
//   topic_probability_<corpus>_<k>topics.txt
//
// producing `<corpus>_<k>_topics.json` for every corpus / topic-count pair.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use super::artifact::{process, MergeReport};
use super::readers::{read_id_list, read_topic_probabilities, read_topic_summary};

pub const DEFAULT_CORPORA: [&str; 2] = ["loan", "journal"];
pub const DEFAULT_TOPIC_COUNTS: [u32; 2] = [10, 50];

/// Input files for one corpus / topic-count pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageJob {
    pub id_list: PathBuf,
    pub summary: PathBuf,
    pub probabilities: PathBuf,
    pub output: PathBuf,
}

impl PackageJob {
    pub fn for_corpus(data_dir: &Path, output_dir: &Path, corpus: &str, num_topics: u32) -> Self {
        Self {
            id_list: data_dir.join(format!("{corpus}_list.txt")),
            summary: data_dir.join(format!("summary_{corpus}_{num_topics}topics.txt")),
            probabilities: data_dir
                .join(format!("topic_probability_{corpus}_{num_topics}topics.txt")),
            output: output_dir.join(format!("{corpus}_{num_topics}_topics.json")),
        }
    }

    /// Read the three inputs and write the artifact.
    pub fn run(&self) -> Result<MergeReport> {
        let ids = read_id_list(&self.id_list)?;
        let topics = read_topic_summary(&self.summary)?;
        let probabilities = read_topic_probabilities(&self.probabilities)?;
        info!(
            ids = ids.len(),
            topics = topics.len(),
            rows = probabilities.len(),
            output = %self.output.display(),
            "Packaging topics"
        );
        process(&ids, &topics, &probabilities, &self.output)
    }
}

/// Every job for the given corpora and topic counts, corpus-major order.
pub fn plan(
    data_dir: &Path,
    output_dir: &Path,
    corpora: &[&str],
    topic_counts: &[u32],
) -> Vec<PackageJob> {
    corpora
        .iter()
        .flat_map(|corpus| {
            topic_counts
                .iter()
                .map(move |&k| PackageJob::for_corpus(data_dir, output_dir, corpus, k))
        })
        .collect()
}

/// Run every job, stopping at the first failure.
pub fn package_all(jobs: &[PackageJob]) -> Result<Vec<(PathBuf, MergeReport)>> {
    let mut results = Vec::with_capacity(jobs.len());
    for job in jobs {
        results.push((job.output.clone(), job.run()?));
    }
    Ok(results)
}
