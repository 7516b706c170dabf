// Raw corpus reader.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::record::DocumentRecord;
use super::schema::RecordSchema;

/// Records read from one raw file, in first-seen id order.
#[derive(Debug, Default)]
pub struct Corpus {
    pub records: Vec<DocumentRecord>,
    /// Lines read, including rejected ones.
    pub lines_read: usize,
    pub lines_rejected: usize,
    index: HashMap<String, usize>,
}

impl Corpus {
    /// Percentage of input lines that produced a record.
    pub fn percent_kept(&self) -> f64 {
        if self.lines_read == 0 {
            return 0.0;
        }
        100.0 * (self.lines_read - self.lines_rejected) as f64 / self.lines_read as f64
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record. A repeated id replaces the earlier record in place.
    pub fn insert(&mut self, record: DocumentRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Records whose field `key` equals `value`; every record when no
    /// filter is given.
    pub fn matching<'a>(
        &'a self,
        filter: Option<&'a FieldFilter>,
    ) -> impl Iterator<Item = &'a DocumentRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| filter.is_none_or(|f| f.matches(r)))
    }
}

/// A `key=value` record filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub key: String,
    pub value: String,
}

impl FieldFilter {
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        record.field(&self.key).as_deref() == Some(self.value.as_str())
    }
}

impl FromStr for FieldFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(format!("expected key=value, got {s:?}")),
        }
    }
}

/// Read and parse every line of `path` with `schema`. Short lines are
/// skipped; an unreadable file is fatal.
pub fn read_raw_file(path: &Path, schema: RecordSchema) -> Result<Corpus> {
    info!(path = %path.display(), ?schema, "Reading raw corpus");
    let file =
        File::open(path).with_context(|| format!("opening raw corpus {}", path.display()))?;
    read_raw(BufReader::new(file), schema)
        .with_context(|| format!("reading raw corpus {}", path.display()))
}

/// Same as [`read_raw_file`] over any buffered reader.
pub fn read_raw<R: BufRead>(reader: R, schema: RecordSchema) -> Result<Corpus> {
    let mut corpus = Corpus::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("line {}", line_no + 1))?;
        corpus.lines_read += 1;
        match schema.get_fields(line.trim_end()) {
            Ok(record) => corpus.insert(record),
            Err(rejected) => {
                corpus.lines_rejected += 1;
                debug!(line = line_no + 1, reason = %rejected, "Skipping line");
            }
        }
    }

    info!(
        records = corpus.len(),
        rejected = corpus.lines_rejected,
        percent_kept = corpus.percent_kept(),
        "Finished reading corpus"
    );
    Ok(corpus)
}
