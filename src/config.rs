use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use crate::estimator::plsa::{binaries_present, ANALYSIS_BINARY, ESTIMATION_BINARY};
use crate::estimator::traits::Cutoffs;

pub const DEFAULT_BIN_DIR: &str = "topic/bin";
pub const DEFAULT_TEMP_DIR: &str = "tmp";
pub const DEFAULT_NUM_TOPICS: u32 = 50;
pub const DEFAULT_LANG_FILTER: &str = "en";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Command-line flags
/// override individual fields after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory containing the PLSA estimation and analysis binaries
    pub bin_dir: PathBuf,
    /// Scratch space for counts, feature, and model files
    pub temp_dir: PathBuf,
    /// Terms excluded from topic modeling. When unset, the built-in English
    /// stop-word list is written to the temp directory and used instead.
    pub stop_list: Option<PathBuf>,
    pub num_topics: u32,
    pub cutoffs: Cutoffs,
    /// Only documents identified as this language are topic-modeled
    pub lang_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            stop_list: None,
            num_topics: DEFAULT_NUM_TOPICS,
            cutoffs: Cutoffs::default(),
            lang_filter: DEFAULT_LANG_FILTER.to_string(),
        }
    }
}

/// Parse `key` from `lookup`, falling back to `default` when unset.
fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}={raw:?} is not valid: {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source. Every variable is
    /// optional.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let num_topics = parse_var(&lookup, "TOPICTAG_NUM_TOPICS", defaults.num_topics)?;
        if num_topics == 0 {
            anyhow::bail!("TOPICTAG_NUM_TOPICS must be at least 1");
        }

        Ok(Self {
            bin_dir: lookup("TOPICTAG_BIN_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.bin_dir),
            temp_dir: lookup("TOPICTAG_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            stop_list: lookup("TOPICTAG_STOP_LIST")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            num_topics,
            cutoffs: Cutoffs {
                tf: parse_var(&lookup, "TOPICTAG_TF_CUTOFF", defaults.cutoffs.tf)?,
                df: parse_var(&lookup, "TOPICTAG_DF_CUTOFF", defaults.cutoffs.df)?,
            },
            lang_filter: lookup("TOPICTAG_LANG_FILTER").unwrap_or(defaults.lang_filter),
        })
    }

    /// Check that the estimator binaries are installed.
    /// Call this before any run that trains a topic model.
    pub fn require_estimator(&self) -> Result<()> {
        if !binaries_present(&self.bin_dir) {
            anyhow::bail!(
                "Topic estimator not found in {}\n\
                 Expected {ESTIMATION_BINARY} and {ANALYSIS_BINARY}.\n\
                 Set TOPICTAG_BIN_DIR or pass --bin-dir, or run `topictag normalize` \
                 to stop after writing the counts file.",
                self.bin_dir.display()
            );
        }
        Ok(())
    }

    /// Check the stop list exists when one is configured.
    pub fn require_stop_list(&self) -> Result<()> {
        if let Some(path) = &self.stop_list {
            if !path.is_file() {
                anyhow::bail!("Stop list {} does not exist", path.display());
            }
        }
        Ok(())
    }
}
