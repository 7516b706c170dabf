// PLSA estimator: runs the `plsa_estimation_combined_file` and
// `plsa_analysis` binaries.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};
use tracing::info;

use super::traits::{AnalysisFiles, EstimationRequest, ModelHandle, TopicEstimator};

pub const ESTIMATION_BINARY: &str = "plsa_estimation_combined_file";
pub const ANALYSIS_BINARY: &str = "plsa_analysis";

/// Check whether both binaries exist in `bin_dir`.
pub fn binaries_present(bin_dir: &Path) -> bool {
    bin_dir.join(ESTIMATION_BINARY).is_file() && bin_dir.join(ANALYSIS_BINARY).is_file()
}

/// Runs the PLSA tools. Intermediate files go to `work_dir`, the summary
/// and matrix to `output_dir`, all named `<prefix>.<topics>.*`.
pub struct PlsaBinary {
    pub bin_dir: PathBuf,
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl PlsaBinary {
    fn file_name(&self, dir: &Path, num_topics: u32, suffix: &str) -> PathBuf {
        dir.join(format!("{}.{}.{}", self.prefix, num_topics, suffix))
    }

    /// Paths the next `estimate` call will write.
    pub fn feature_list_path(&self, num_topics: u32) -> PathBuf {
        self.file_name(&self.work_dir, num_topics, "feat.txt")
    }

    pub fn model_path(&self, num_topics: u32) -> PathBuf {
        self.file_name(&self.work_dir, num_topics, "plsa")
    }

    pub fn summary_path(&self, num_topics: u32) -> PathBuf {
        self.file_name(&self.output_dir, num_topics, "summary.txt")
    }

    pub fn probability_path(&self, num_topics: u32) -> PathBuf {
        self.file_name(&self.output_dir, num_topics, "d2z.txt")
    }

    /// Build the estimation command line.
    pub fn estimation_args(&self, request: &EstimationRequest) -> Vec<OsString> {
        let num_topics = request.num_topics;
        vec![
            "-vector_list_in".into(),
            request.counts_file.clone().into(),
            "-stop_list_in".into(),
            request.stop_list.clone().into(),
            "-tf".into(),
            request.cutoffs.tf.to_string().into(),
            "-df".into(),
            request.cutoffs.df.to_string().into(),
            "-num_topics".into(),
            num_topics.to_string().into(),
            "-random".into(),
            "-feature_list_out".into(),
            self.feature_list_path(num_topics).into(),
            "-plsa_model_out".into(),
            self.model_path(num_topics).into(),
        ]
    }

    fn run(&self, binary: &str, args: &[OsString]) -> Result<Output> {
        let program = self.bin_dir.join(binary);
        let rendered = format!(
            "{} {}",
            program.display(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );
        info!(command = %rendered, "Running topic estimator");

        let output = Command::new(&program)
            .args(args)
            .output()
            .with_context(|| format!("launching {rendered}"))?;
        if !output.status.success() {
            anyhow::bail!(
                "{rendered} failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }
}

impl TopicEstimator for PlsaBinary {
    fn estimate(&self, request: &EstimationRequest) -> Result<ModelHandle> {
        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("creating work directory {}", self.work_dir.display()))?;
        self.run(ESTIMATION_BINARY, &self.estimation_args(request))?;
        Ok(ModelHandle {
            model_file: self.model_path(request.num_topics),
            num_topics: request.num_topics,
        })
    }

    fn analyze(&self, model: &ModelHandle) -> Result<AnalysisFiles> {
        let summary_file = self.summary_path(model.num_topics);
        let probability_file = self.probability_path(model.num_topics);

        // The summary report goes to stdout
        let summarize = vec![
            OsString::from("-plsa_model_in"),
            model.model_file.clone().into(),
            OsString::from("-summarize"),
        ];
        let output = self.run(ANALYSIS_BINARY, &summarize)?;
        fs::write(&summary_file, &output.stdout)
            .with_context(|| format!("writing topic summary {}", summary_file.display()))?;

        let d2z = vec![
            OsString::from("-plsa_model_in"),
            model.model_file.clone().into(),
            OsString::from("-d2z"),
            probability_file.clone().into(),
        ];
        self.run(ANALYSIS_BINARY, &d2z)?;

        Ok(AnalysisFiles {
            summary_file,
            probability_file,
        })
    }
}
