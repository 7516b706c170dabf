// Unit tests for the topic packager.
//
// Tests summary-line parsing, argmax tie handling, merge pairing, and the
// JSON artifact written to disk.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use topictag::packager::artifact::{argmax, merge, process, to_json, TopicArtifact};
use topictag::packager::batch::{package_all, plan};
use topictag::packager::readers::{parse_topic_probabilities, SummaryParser, TopicSummary};

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn two_topics() -> Vec<TopicSummary> {
    let parser = SummaryParser::new().unwrap();
    vec![
        parser
            .parse_line("    1 (  46)  3.66  0.659  5.55  rural areas banking")
            .unwrap(),
        parser
            .parse_line("    2 (  12)  2.10  0.500  4.00  goats milk")
            .unwrap(),
    ]
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("topictag_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================
// Summary parsing
// ============================================================

#[test]
fn summary_line_parses_to_zero_based_topic() {
    let topic = SummaryParser::new()
        .unwrap()
        .parse_line("    1 (  46)  3.66  0.659  5.55  rural areas banking")
        .unwrap();
    assert_eq!(topic.topic_num, 0);
    assert_eq!(topic.doc_count, 46);
    assert_eq!(topic.topic_score, 3.66);
    assert_eq!(topic.doc_purity, 0.659);
    assert!((topic.fraction_of_docs - 0.0555).abs() < 1e-12);
    assert_eq!(topic.summary_words, vec!["rural", "areas", "banking"]);
}

#[test]
fn summary_banner_lines_are_skipped() {
    let report = "\
PLSA topic summary
Topic (Docs) Score Purity %Docs Words
    1 (  46)  3.66  0.659  5.55  rural areas banking
-----
    2 (  12)  2.10  0.500  4.00  goats milk
";
    let topics = SummaryParser::new()
        .unwrap()
        .parse(Cursor::new(report))
        .unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[1].topic_num, 1);
    assert_eq!(topics[1].summary_words, vec!["goats", "milk"]);
}

#[test]
fn probability_matrix_parses_rows() {
    let rows = parse_topic_probabilities(Cursor::new("0.1 0.9\n\n0.7\t0.3\n")).unwrap();
    assert_eq!(rows, vec![vec![0.1, 0.9], vec![0.7, 0.3]]);
}

#[test]
fn probability_matrix_bad_value_names_line() {
    let err = parse_topic_probabilities(Cursor::new("0.1 0.9\n0.7 abc\n")).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

// ============================================================
// Merge
// ============================================================

#[test]
fn merge_assigns_argmax_topics() {
    let (artifact, report) = merge(
        "loan_10_topics.json",
        &ids(&["a", "b"]),
        &two_topics(),
        &[vec![0.1, 0.9], vec![0.7, 0.3]],
    )
    .unwrap();
    assert!(report.is_clean());

    let a = artifact.document_topics.get("a").unwrap();
    assert_eq!(a.top_topic, 1);
    assert_eq!(a.topic_probabilities, vec![0.1, 0.9]);
    let b = artifact.document_topics.get("b").unwrap();
    assert_eq!(b.top_topic, 0);
    assert_eq!(b.topic_probabilities, vec![0.7, 0.3]);
}

#[test]
fn tie_goes_to_lowest_index() {
    assert_eq!(argmax(&[0.5, 0.5]), Some(0));
    let (artifact, _) = merge("x.json", &ids(&["a"]), &two_topics(), &[vec![0.5, 0.5]]).unwrap();
    assert_eq!(artifact.document_topics.get("a").unwrap().top_topic, 0);
}

#[test]
fn extra_rows_are_reported_not_paired() {
    let (artifact, report) = merge(
        "x.json",
        &ids(&["a"]),
        &two_topics(),
        &[vec![0.1, 0.9], vec![0.7, 0.3]],
    )
    .unwrap();
    assert_eq!(artifact.document_topics.len(), 1);
    assert_eq!(report.paired, 1);
    assert_eq!(report.unpaired_rows, 1);
    assert!(!report.is_clean());
}

// ============================================================
// JSON artifact
// ============================================================

#[test]
fn artifact_round_trips_through_json() {
    let (artifact, _) = merge(
        "loan_10_topics.json",
        &ids(&["a", "b"]),
        &two_topics(),
        &[vec![0.1, 0.9], vec![0.7, 0.3]],
    )
    .unwrap();
    let json = to_json(&artifact).unwrap();

    let parsed: TopicArtifact = serde_json::from_str(&json).unwrap();
    let original: serde_json::Value = serde_json::from_str(&json).unwrap();
    let reparsed = serde_json::to_value(&parsed).unwrap();
    assert_eq!(original, reparsed);
    assert_eq!(parsed.document_topics, artifact.document_topics);
}

#[test]
fn artifact_top_level_key_order() {
    let (artifact, _) = merge("x.json", &ids(&["a"]), &two_topics(), &[vec![0.2, 0.8]]).unwrap();
    let json = to_json(&artifact).unwrap();
    let filename = json.find("\"filename\"").unwrap();
    let topics = json.find("\"topics\"").unwrap();
    let documents = json.find("\"document_topics\"").unwrap();
    assert!(filename < topics && topics < documents);
    assert!(json.contains("\n \"filename\": \"x.json\",\n"));
}

#[test]
fn process_writes_named_artifact() {
    let dir = scratch_dir("process");
    let output = dir.join("loan_10_topics.json");
    let report = process(
        &ids(&["a", "b"]),
        &two_topics(),
        &[vec![0.1, 0.9], vec![0.7, 0.3]],
        &output,
    )
    .unwrap();
    assert_eq!(report.paired, 2);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["filename"], "loan_10_topics.json");
    assert_eq!(value["topics"][0]["summary_words"][0], "rural");
    assert_eq!(value["document_topics"]["a"]["top_topic"], 1);
    assert!(value["topics"][0].get("doc_count").is_none());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn batch_packages_data_directory() {
    let dir = scratch_dir("batch");
    fs::write(dir.join("loan_list.txt"), "a\nb\n").unwrap();
    fs::write(
        dir.join("summary_loan_10topics.txt"),
        "    1 (  46)  3.66  0.659  5.55  rural areas banking\n    2 (  12)  2.10  0.500  4.00  goats milk\n",
    )
    .unwrap();
    fs::write(
        dir.join("topic_probability_loan_10topics.txt"),
        "0.1 0.9\n0.7 0.3\n",
    )
    .unwrap();

    let jobs = plan(&dir, &dir, &["loan"], &[10]);
    let results = package_all(&jobs).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, dir.join("loan_10_topics.json"));
    assert!(results[0].1.is_clean());
    assert!(dir.join("loan_10_topics.json").is_file());

    fs::remove_dir_all(&dir).unwrap();
}
