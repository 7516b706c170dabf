// Normalization engine: the text cascade between raw records and counts.
//
// Pass 1 (`text`) cleans every record for language identification. Pass 2
// (`topic`) and counting (`counts`) only run on records kept for topic
// modeling. The rewrite table is built once and owned by the engine.

pub mod counts;
pub mod rewrite;
pub mod rules;
pub mod text;
pub mod topic;

use anyhow::{Context, Result};

use crate::ingest::record::DocumentRecord;
use counts::WordCounter;
use rewrite::RewriteTable;
use text::TextNormalizer;
use topic::TopicNormalizer;

/// All normalization stages, compiled once per run.
///
/// Holds no per-document state, so a shared reference can be used from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct Normalizer {
    pub text: TextNormalizer,
    pub topic: TopicNormalizer,
    pub counter: WordCounter,
}

impl Normalizer {
    pub fn new(table: RewriteTable) -> Result<Self> {
        Ok(Self {
            text: TextNormalizer::new()?,
            topic: TopicNormalizer::new(table)?,
            counter: WordCounter::new()?,
        })
    }

    /// Pass 1: `msg` -> `msg_norm`.
    pub fn normalize_general(&self, record: &mut DocumentRecord) -> Result<()> {
        let msg_norm = self.text.normalize(&record.msg);
        record.set_msg_norm(msg_norm)
    }

    /// Pass 2 and counting: `msg_norm` -> `msg_topic` -> `counts`.
    /// Requires Pass 1 to have run.
    pub fn normalize_topic(&self, record: &mut DocumentRecord) -> Result<()> {
        let msg_norm = record
            .msg_norm()
            .with_context(|| format!("document {} has no msg_norm yet", record.id))?;
        let msg_topic = self.topic.normalize(msg_norm);
        let counts = self.counter.count(&msg_topic);
        record.set_msg_topic(msg_topic)?;
        record.set_counts(counts)
    }
}
