// Stop list for the estimator: one term per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};
use tracing::info;

/// Sorted, deduplicated English stop words.
pub fn default_stop_words() -> Vec<String> {
    let mut words: Vec<String> = get(LANGUAGE::English);
    words.sort();
    words.dedup();
    words
}

/// Write `words` to `path`, one per line. Returns how many were written.
pub fn write_stop_list(path: &Path, words: &[String]) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("creating stop list {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for word in words {
        writeln!(out, "{word}")?;
    }
    out.flush()
        .with_context(|| format!("writing stop list {}", path.display()))?;
    info!(path = %path.display(), terms = words.len(), "Wrote stop list");
    Ok(words.len())
}
