// Composition tests: the whole corpus run with stand-in collaborators.
//
// These tests exercise the data flow between modules:
//   raw file -> Normalizer -> counts file -> TopicEstimator -> Packager
// with a fake language identifier and a fake estimator that writes its
// report files directly. Files go under the system temp directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use topictag::config::Config;
use topictag::estimator::traits::{AnalysisFiles, EstimationRequest, ModelHandle, TopicEstimator};
use topictag::ingest::schema::RecordSchema;
use topictag::langid::traits::LanguageIdentifier;
use topictag::normalize::rewrite::RewriteTable;
use topictag::normalize::Normalizer;
use topictag::pipeline::run::{prepare, run, RunOptions};

/// Tags anything containing "Hola" as Spanish, everything else English.
struct KeywordIdentifier;

impl LanguageIdentifier for KeywordIdentifier {
    fn identify(&self, text: &str) -> String {
        if text.contains("Hola") {
            "es".to_string()
        } else {
            "en".to_string()
        }
    }
}

/// Writes a two-topic summary and one probability row per counts line.
struct FakeEstimator {
    output_dir: PathBuf,
}

impl TopicEstimator for FakeEstimator {
    fn estimate(&self, request: &EstimationRequest) -> Result<ModelHandle> {
        anyhow::ensure!(request.stop_list.is_file(), "stop list was not written");
        // The counts file doubles as the "model" so analyze can size the matrix
        Ok(ModelHandle {
            model_file: request.counts_file.clone(),
            num_topics: request.num_topics,
        })
    }

    fn analyze(&self, model: &ModelHandle) -> Result<AnalysisFiles> {
        let documents = fs::read_to_string(&model.model_file)?.lines().count();
        let summary_file = self.output_dir.join("fake.summary.txt");
        let probability_file = self.output_dir.join("fake.d2z.txt");

        fs::write(
            &summary_file,
            "Topic summary\n\
             \x20   1 (   2)  3.66  0.659  66.67  rice beans market\n\
             \x20   2 (   1)  2.10  0.500  33.33  goats chickens family\n",
        )?;
        let rows: Vec<&str> = (0..documents)
            .map(|i| if i % 2 == 0 { "0.8 0.2" } else { "0.3 0.7" })
            .collect();
        fs::write(&probability_file, rows.join("\n"))?;

        Ok(AnalysisFiles {
            summary_file,
            probability_file,
        })
    }
}

/// Estimator for runs that must stop before estimation.
struct UnreachableEstimator;

impl TopicEstimator for UnreachableEstimator {
    fn estimate(&self, _request: &EstimationRequest) -> Result<ModelHandle> {
        anyhow::bail!("estimate should not be called")
    }

    fn analyze(&self, _model: &ModelHandle) -> Result<AnalysisFiles> {
        anyhow::bail!("analyze should not be called")
    }
}

const CORPUS: &str = "\
1\tShe sells rice and beans at the market.
2\tHe raises goats and chickens for the family.
3\tshort
4\tHola amigos
a line without any tab
";

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("topictag_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn corpus(&self, contents: &str) -> PathBuf {
        let path = self.root.join("loans.tsv");
        fs::write(&path, contents).unwrap();
        path
    }

    fn config(&self) -> Config {
        Config {
            temp_dir: self.root.join("tmp"),
            ..Config::default()
        }
    }

    fn options(&self, input: &Path) -> RunOptions {
        RunOptions {
            input: input.to_path_buf(),
            schema: RecordSchema::Simple,
            output_dir: self.root.join("output"),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn normalizer() -> Normalizer {
    Normalizer::new(RewriteTable::new()).unwrap()
}

// ============================================================
// Chain: raw file -> counts file
// ============================================================

#[test]
fn prepare_writes_counts_for_target_language_only() {
    let ws = Workspace::new("prepare");
    let input = ws.corpus(CORPUS);
    let config = ws.config();

    let outcome = prepare(&config, &ws.options(&input), &normalizer(), &KeywordIdentifier).unwrap();

    assert_eq!(outcome.corpus.lines_read, 5);
    assert_eq!(outcome.corpus.lines_rejected, 1);
    assert_eq!(outcome.stats.documents, 4);
    assert_eq!(outcome.stats.languages.get("en"), Some(&3));
    assert_eq!(outcome.stats.languages.get("es"), Some(&1));
    assert_eq!(outcome.stats.topic_documents, 3);
    assert_eq!(outcome.counted_documents, 3);

    // Spanish record is normalized but never counted
    let spanish = outcome.corpus.get("4").unwrap();
    assert_eq!(spanish.lang_code(), Some("es"));
    assert!(spanish.msg_norm().is_some());
    assert!(spanish.counts().is_none());

    let counts = fs::read_to_string(&outcome.paths.counts_file).unwrap();
    let lines: Vec<&str> = counts.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 "));
    assert!(lines[0].contains(" market|1.0"));
    assert_eq!(lines[2], "3 short|1.0");

    let ids = fs::read_to_string(&outcome.paths.id_list).unwrap();
    assert_eq!(ids, "1\n2\n3\n");
    assert!(outcome.paths.counts_file.ends_with("loans.tsv.50.counts.txt"));
}

// ============================================================
// Chain: raw file -> estimator -> JSON artifact
// ============================================================

#[test]
fn full_run_produces_artifact() {
    let ws = Workspace::new("full_run");
    let input = ws.corpus(CORPUS);
    let config = ws.config();
    let options = ws.options(&input);
    let estimator = FakeEstimator {
        output_dir: options.output_dir.clone(),
    };

    let outcome = run(&config, &options, &normalizer(), &KeywordIdentifier, &estimator).unwrap();

    let report = outcome.merge.as_ref().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.paired, 3);
    assert!(config.temp_dir.join("stop_list_en.txt").is_file());

    let artifact_path = &outcome.paths.artifact;
    assert!(artifact_path.ends_with("loans.tsv.50.topics.json"));
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(artifact_path).unwrap()).unwrap();

    assert_eq!(value["filename"], "loans.tsv.50.topics.json");
    assert_eq!(value["topics"].as_array().unwrap().len(), 2);
    assert_eq!(value["topics"][1]["summary_words"][0], "goats");
    assert_eq!(value["document_topics"]["1"]["top_topic"], 0);
    assert_eq!(value["document_topics"]["2"]["top_topic"], 1);
    assert_eq!(value["document_topics"]["3"]["top_topic"], 0);
    assert!(value["document_topics"].get("4").is_none());
}

#[test]
fn run_without_target_language_skips_estimation() {
    let ws = Workspace::new("no_target");
    let input = ws.corpus(CORPUS);
    let config = Config {
        lang_filter: "fr".to_string(),
        ..ws.config()
    };
    let options = ws.options(&input);

    let outcome = run(
        &config,
        &options,
        &normalizer(),
        &KeywordIdentifier,
        &UnreachableEstimator,
    )
    .unwrap();

    assert_eq!(outcome.counted_documents, 0);
    assert!(outcome.analysis.is_none());
    assert!(outcome.merge.is_none());
    assert!(!outcome.paths.artifact.exists());
}

#[test]
fn estimator_failure_is_reported_with_stage() {
    let ws = Workspace::new("estimator_failure");
    let input = ws.corpus(CORPUS);
    let config = ws.config();

    let err = run(
        &config,
        &ws.options(&input),
        &normalizer(),
        &KeywordIdentifier,
        &UnreachableEstimator,
    )
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("topic estimation failed"));
    assert!(message.contains("estimate should not be called"));
}

#[test]
fn missing_input_names_the_file() {
    let ws = Workspace::new("missing_input");
    let config = ws.config();
    let missing = ws.root.join("nope.tsv");

    let err = prepare(&config, &ws.options(&missing), &normalizer(), &KeywordIdentifier).unwrap_err();
    assert!(format!("{err:#}").contains("nope.tsv"));
}
