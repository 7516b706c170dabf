// Readers for the three files the packager merges: the document id list,
// the ranked topic summary report, and the document-topic matrix.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One ranked topic from the summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    /// 0-based topic index (the report is 1-based)
    pub topic_num: usize,
    /// Document count shown in parentheses in the report. Not part of the
    /// JSON artifact.
    #[serde(skip, default)]
    pub doc_count: u32,
    pub topic_score: f64,
    pub doc_purity: f64,
    /// Share of the corpus assigned to this topic, 0.0 to 1.0
    pub fraction_of_docs: f64,
    pub summary_words: Vec<String>,
}

/// Matches a report row such as
/// `    1 (  46)  3.66  0.659  5.55  rural areas banking`
const SUMMARY_LINE: &str =
    r"^\s*(\d+)\s+\(\s*(\d+)\)\s+([\d.]+)\s+([\d.]+)\s+([\d.]+)\s+(.*)$";

/// Parses topic summary rows, ignoring banners and headers.
#[derive(Debug, Clone)]
pub struct SummaryParser {
    line: Regex,
}

impl SummaryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            line: Regex::new(SUMMARY_LINE).context("compiling topic summary pattern")?,
        })
    }

    /// Parse one report line. Anything that is not a topic row gives `None`.
    pub fn parse_line(&self, line: &str) -> Option<TopicSummary> {
        let caps = self.line.captures(line.trim_end())?;
        let rank: usize = caps[1].parse().ok()?;
        Some(TopicSummary {
            topic_num: rank.checked_sub(1)?,
            doc_count: caps[2].parse().ok()?,
            topic_score: caps[3].parse().ok()?,
            doc_purity: caps[4].parse().ok()?,
            fraction_of_docs: caps[5].parse::<f64>().ok()? / 100.0,
            summary_words: caps[6].split_whitespace().map(str::to_string).collect(),
        })
    }

    /// Parse every topic row from a reader, in report order.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<TopicSummary>> {
        let mut topics = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("line {}", line_no + 1))?;
            match self.parse_line(&line) {
                Some(topic) => topics.push(topic),
                None => debug!(line = line_no + 1, "Skipping non-topic summary line"),
            }
        }
        Ok(topics)
    }
}

/// Read an id list: one id per line, surrounding whitespace removed.
pub fn read_id_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening id list {}", path.display()))?;
    BufReader::new(file)
        .lines()
        .map(|line| line.map(|l| l.trim().to_string()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading id list {}", path.display()))
}

/// Write an id list in the format `read_id_list` expects.
pub fn write_id_list(path: &Path, ids: &[String]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating id list {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for id in ids {
        writeln!(out, "{id}")?;
    }
    out.flush()
        .with_context(|| format!("writing id list {}", path.display()))
}

/// Read the ranked topic summary report.
pub fn read_topic_summary(path: &Path) -> Result<Vec<TopicSummary>> {
    let file = File::open(path)
        .with_context(|| format!("opening topic summary {}", path.display()))?;
    SummaryParser::new()?
        .parse(BufReader::new(file))
        .with_context(|| format!("reading topic summary {}", path.display()))
}

/// Parse a matrix of whitespace-separated floats, one row per line.
/// Blank lines are skipped.
pub fn parse_topic_probabilities<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|p| {
                p.parse::<f64>()
                    .with_context(|| format!("line {}: bad probability {p:?}", line_no + 1))
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read the document-topic probability matrix.
pub fn read_topic_probabilities(path: &Path) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path)
        .with_context(|| format!("opening topic probabilities {}", path.display()))?;
    parse_topic_probabilities(BufReader::new(file))
        .with_context(|| format!("reading topic probabilities {}", path.display()))
}
