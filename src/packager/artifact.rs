// The consolidated topic artifact: topic summaries plus each document's
// top topic and full probability row, written as indented JSON.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

use super::readers::TopicSummary;

/// A document's topic assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTopics {
    /// Index of the highest probability, lowest index on ties
    pub top_topic: usize,
    pub topic_probabilities: Vec<f64>,
}

/// Document id -> assignment, serialized in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTopicMap {
    entries: Vec<(String, DocumentTopics)>,
    index: HashMap<String, usize>,
}

impl DocumentTopicMap {
    /// Insert an assignment. A repeated id overwrites the earlier value but
    /// keeps its original position. Returns true if the id was new.
    pub fn insert(&mut self, id: String, topics: DocumentTopics) -> bool {
        match self.index.get(&id) {
            Some(&pos) => {
                self.entries[pos].1 = topics;
                false
            }
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, topics));
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&DocumentTopics> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentTopics)> {
        self.entries.iter().map(|(id, t)| (id.as_str(), t))
    }
}

impl Serialize for DocumentTopicMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, t)| (id, t)))
    }
}

impl<'de> Deserialize<'de> for DocumentTopicMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = DocumentTopicMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of document ids to topic assignments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = DocumentTopicMap::default();
                while let Some((id, topics)) = access.next_entry::<String, DocumentTopics>()? {
                    map.insert(id, topics);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// The JSON artifact for one corpus and topic count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicArtifact {
    pub filename: String,
    pub topics: Vec<TopicSummary>,
    pub document_topics: DocumentTopicMap,
}

/// What happened while pairing ids with matrix rows.
///
/// Pairing stops at the shorter of the two lists; the leftovers are counted
/// here instead of being dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub paired: usize,
    /// Ids with no matrix row
    pub unpaired_ids: usize,
    /// Matrix rows with no id
    pub unpaired_rows: usize,
    /// Rows whose length differs from the number of topics
    pub width_mismatches: usize,
    /// Ids seen more than once (the last row wins)
    pub duplicate_ids: usize,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.unpaired_ids == 0
            && self.unpaired_rows == 0
            && self.width_mismatches == 0
            && self.duplicate_ids == 0
    }
}

/// Index of the largest value; the first one wins ties. `None` when empty.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, top)) if !(v > top) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Pair ids with probability rows, positionally.
pub fn merge(
    filename: &str,
    document_ids: &[String],
    topics: &[TopicSummary],
    probabilities: &[Vec<f64>],
) -> Result<(TopicArtifact, MergeReport)> {
    let mut document_topics = DocumentTopicMap::default();
    let mut report = MergeReport::default();

    for (id, row) in document_ids.iter().zip(probabilities) {
        let top_topic = argmax(row)
            .with_context(|| format!("document {id} has an empty probability row"))?;
        if row.len() != topics.len() {
            report.width_mismatches += 1;
        }
        let is_new = document_topics.insert(
            id.clone(),
            DocumentTopics {
                top_topic,
                topic_probabilities: row.clone(),
            },
        );
        if !is_new {
            report.duplicate_ids += 1;
        }
        report.paired += 1;
    }
    report.unpaired_ids = document_ids.len().saturating_sub(probabilities.len());
    report.unpaired_rows = probabilities.len().saturating_sub(document_ids.len());

    let artifact = TopicArtifact {
        filename: filename.to_string(),
        topics: topics.to_vec(),
        document_topics,
    };
    Ok((artifact, report))
}

/// Serialize with one-space indentation, `,` and `: ` separators.
pub fn to_json(artifact: &TopicArtifact) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    artifact
        .serialize(&mut serializer)
        .context("serializing topic artifact")?;
    Ok(String::from_utf8(buf)?)
}

/// Merge and write one artifact to `output_path`. The artifact's
/// `filename` field is the output file name.
pub fn process(
    document_ids: &[String],
    topics: &[TopicSummary],
    probabilities: &[Vec<f64>],
    output_path: &Path,
) -> Result<MergeReport> {
    let filename = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_path.display().to_string());

    let (artifact, report) = merge(&filename, document_ids, topics, probabilities)?;
    if !report.is_clean() {
        warn!(
            output = %output_path.display(),
            ids = document_ids.len(),
            rows = probabilities.len(),
            unpaired_ids = report.unpaired_ids,
            unpaired_rows = report.unpaired_rows,
            width_mismatches = report.width_mismatches,
            duplicate_ids = report.duplicate_ids,
            "Id list and probability matrix do not line up; merge truncated to the shorter"
        );
    }

    info!(output = %output_path.display(), documents = report.paired, "Writing topic artifact");
    let json = to_json(&artifact)?;
    let file = File::create(output_path)
        .with_context(|| format!("creating topic artifact {}", output_path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(json.as_bytes())
        .and_then(|_| out.flush())
        .with_context(|| format!("writing topic artifact {}", output_path.display()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn topic(num: usize, words: &[&str]) -> TopicSummary {
        TopicSummary {
            topic_num: num,
            doc_count: 10,
            topic_score: 1.5,
            doc_purity: 0.5,
            fraction_of_docs: 0.25,
            summary_words: ids(words),
        }
    }

    #[test]
    fn test_argmax_first_wins() {
        assert_eq!(argmax(&[0.1, 0.9]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_merge_assigns_top_topics() {
        let topics = vec![topic(0, &["rice"]), topic(1, &["goats"])];
        let (artifact, report) = merge(
            "x.json",
            &ids(&["a", "b"]),
            &topics,
            &[vec![0.1, 0.9], vec![0.7, 0.3]],
        )
        .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.paired, 2);
        assert_eq!(artifact.document_topics.get("a").unwrap().top_topic, 1);
        assert_eq!(
            artifact.document_topics.get("b").unwrap().topic_probabilities,
            vec![0.7, 0.3]
        );
    }

    #[test]
    fn test_merge_truncates_and_reports() {
        let topics = vec![topic(0, &["rice"]), topic(1, &["goats"])];
        let (artifact, report) = merge(
            "x.json",
            &ids(&["a", "b", "c"]),
            &topics,
            &[vec![0.1, 0.9], vec![0.7, 0.3]],
        )
        .unwrap();
        assert_eq!(artifact.document_topics.len(), 2);
        assert!(artifact.document_topics.get("c").is_none());
        assert_eq!(report.unpaired_ids, 1);
        assert_eq!(report.unpaired_rows, 0);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_merge_duplicate_id_keeps_position() {
        let topics = vec![topic(0, &["rice"]), topic(1, &["goats"])];
        let (artifact, report) = merge(
            "x.json",
            &ids(&["a", "b", "a"]),
            &topics,
            &[vec![0.9, 0.1], vec![0.7, 0.3], vec![0.2, 0.8]],
        )
        .unwrap();
        let order: Vec<&str> = artifact.document_topics.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(artifact.document_topics.get("a").unwrap().top_topic, 1);
        assert_eq!(report.duplicate_ids, 1);
    }

    #[test]
    fn test_merge_counts_width_mismatch() {
        let topics = vec![topic(0, &["rice"]), topic(1, &["goats"])];
        let (_, report) = merge("x.json", &ids(&["a"]), &topics, &[vec![0.2, 0.3, 0.5]]).unwrap();
        assert_eq!(report.width_mismatches, 1);
    }

    #[test]
    fn test_merge_empty_row_is_an_error() {
        let err = merge("x.json", &ids(&["a"]), &[], &[vec![]]).unwrap_err();
        assert!(err.to_string().contains("document a"));
    }

    #[test]
    fn test_json_layout() {
        let (artifact, _) = merge(
            "loan_10_topics.json",
            &ids(&["a"]),
            &[topic(0, &["rice"])],
            &[vec![0.5]],
        )
        .unwrap();
        let expected = r#"{
 "filename": "loan_10_topics.json",
 "topics": [
  {
   "topic_num": 0,
   "topic_score": 1.5,
   "doc_purity": 0.5,
   "fraction_of_docs": 0.25,
   "summary_words": [
    "rice"
   ]
  }
 ],
 "document_topics": {
  "a": {
   "top_topic": 0,
   "topic_probabilities": [
    0.5
   ]
  }
 }
}"#;
        assert_eq!(to_json(&artifact).unwrap(), expected);
    }

    #[test]
    fn test_document_order_is_insertion_order() {
        let (artifact, _) = merge(
            "x.json",
            &ids(&["zeta", "alpha", "mid"]),
            &[topic(0, &["rice"])],
            &[vec![1.0], vec![1.0], vec![1.0]],
        )
        .unwrap();
        let json = to_json(&artifact).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }
}
