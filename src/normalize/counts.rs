// Word counting over topic-normalized text, and the counts file the
// estimator reads.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::rules::{RuleSet, Whitespace};
use crate::ingest::record::DocumentRecord;

/// Token -> frequency for one document. Sorted so the counts file comes
/// out in a stable order.
pub type TokenCounts = BTreeMap<String, f64>;

/// Break markers inserted after sentence terminators before splitting.
const SENTENCE_BREAKS: [(&str, &str); 4] = [
    (". ", ".\n\n"),
    ("? ", "?\n\n"),
    ("! ", "!\n\n"),
    (".\"", ".\"\n\n"),
];

const WORD_PUNCTUATION_RULES: &[(&str, &str)] = &[
    (r"^(\S+)[.!?]", "${1} "),
    (r"\s(\S+)[.!?]", " ${1} "),
    (r"(\S+)[.!?]$", "${1}"),
    (r"\s[.!?]\s", " "),
    (r"^[.!?]$", ""),
];

/// Split text into rough sentences: break after ". ", "? ", "! " and
/// `."`, trim each piece, drop the empty ones.
pub fn simple_sent_split(text: &str) -> Vec<String> {
    let mut marked = text.to_string();
    for (from, to) in SENTENCE_BREAKS {
        marked = marked.replace(from, to);
    }
    marked
        .split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Counts tokens per document.
#[derive(Debug, Clone)]
pub struct WordCounter {
    word_punctuation: RuleSet,
    whitespace: Whitespace,
}

impl WordCounter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word_punctuation: RuleSet::compile("word punctuation", WORD_PUNCTUATION_RULES)?,
            whitespace: Whitespace::new()?,
        })
    }

    /// Strip `.`, `!` and `?` hanging off words, keeping the words.
    pub fn remove_word_punctuation(&self, sentence: &str) -> String {
        self.whitespace
            .squeeze(&self.word_punctuation.apply(sentence))
    }

    /// Count every space-separated token across all sentences of `msg_topic`.
    /// Tokens are case-sensitive.
    pub fn count(&self, msg_topic: &str) -> TokenCounts {
        let mut counts = TokenCounts::new();
        for sentence in simple_sent_split(msg_topic) {
            let cleaned = self.remove_word_punctuation(&sentence);
            if cleaned.is_empty() || cleaned == " " {
                continue;
            }
            for token in cleaned.split(' ') {
                *counts.entry(token.to_string()).or_insert(0.0) += 1.0;
            }
        }
        counts
    }
}

/// Write the estimator input: one line per document that has counts,
/// `<id> <word>|<count> ...` with words in sorted order.
///
/// Returns the ids written, in file order. Matrix rows produced by the
/// estimator follow this order.
pub fn write_counts_file<'a, I>(records: I, path: &Path) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let file = File::create(path)
        .with_context(|| format!("creating counts file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let mut written = Vec::new();

    for record in records {
        let Some(counts) = record.counts() else {
            continue;
        };
        if counts.is_empty() {
            continue;
        }
        write!(out, "{}", record.id)?;
        for (word, count) in counts {
            write!(out, " {word}|{count:?}")?;
        }
        writeln!(out)?;
        written.push(record.id.clone());
    }

    out.flush()
        .with_context(|| format!("writing counts file {}", path.display()))?;
    Ok(written)
}
