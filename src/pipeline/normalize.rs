// Corpus normalization stage: Pass 1 and language id for every record,
// then Pass 2 and counting for records in the target language.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::ingest::reader::Corpus;
use crate::langid::traits::LanguageIdentifier;
use crate::normalize::Normalizer;

/// What the normalization stage did to a corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeStats {
    pub documents: usize,
    /// Documents per language code
    pub languages: BTreeMap<String, usize>,
    /// Documents that went through topic normalization
    pub topic_documents: usize,
    /// Topic-normalized documents left with no tokens
    pub empty_topic: usize,
}

fn progress_bar(len: usize, label: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
            .context("building progress bar template")?,
    );
    Ok(pb)
}

/// Normalize every record in place.
///
/// With `topic_language` set, records whose language code matches it also
/// get `msg_topic` and `counts`; the rest keep only `msg_norm` and
/// `lang_code`.
pub fn normalize_corpus(
    corpus: &mut Corpus,
    normalizer: &Normalizer,
    identifier: &dyn LanguageIdentifier,
    topic_language: Option<&str>,
) -> Result<NormalizeStats> {
    let mut stats = NormalizeStats {
        documents: corpus.len(),
        ..Default::default()
    };

    let pb = progress_bar(corpus.len(), "Normalizing")?;
    for record in corpus.records.iter_mut() {
        normalizer.normalize_general(record)?;
        let lang = identifier.identify(record.msg_norm().unwrap_or_default());
        *stats.languages.entry(lang.clone()).or_insert(0) += 1;
        record.set_lang_code(lang)?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    info!(documents = stats.documents, languages = ?stats.languages, "General normalization done");

    let Some(target) = topic_language else {
        return Ok(stats);
    };

    let pb = progress_bar(corpus.len(), "Counting")?;
    for record in corpus.records.iter_mut() {
        pb.inc(1);
        if record.lang_code() != Some(target) {
            continue;
        }
        normalizer.normalize_topic(record)?;
        stats.topic_documents += 1;
        if record.counts().is_none_or(|c| c.is_empty()) {
            stats.empty_topic += 1;
        }
    }
    pb.finish_and_clear();
    info!(
        language = target,
        documents = stats.topic_documents,
        empty = stats.empty_topic,
        "Topic normalization done"
    );

    Ok(stats)
}
