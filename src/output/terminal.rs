// Colored terminal output for topic summaries, run results, and records.
//
// main.rs display calls delegate here; nothing in this module logs.

use std::path::PathBuf;

use colored::Colorize;

use crate::ingest::record::DocumentRecord;
use crate::packager::artifact::MergeReport;
use crate::packager::readers::TopicSummary;
use crate::pipeline::normalize::NormalizeStats;
use crate::pipeline::run::RunOutcome;

/// Display a ranked topic summary.
pub fn display_topic_summary(topics: &[TopicSummary]) {
    if topics.is_empty() {
        println!("No topics parsed from the summary report.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topics ({}) ===", topics.len()).bold()
    );
    println!();
    println!(
        "  {:>5}  {:>6}  {:>6}  {:>6}  {}",
        "Topic".dimmed(),
        "Score".dimmed(),
        "Purity".dimmed(),
        "Docs".dimmed(),
        "Words".dimmed(),
    );
    println!("  {}", "-".repeat(72).dimmed());

    for topic in topics {
        let words = super::truncate_chars(&topic.summary_words.join(" "), 48);
        println!(
            "  {:>5}  {:>6.2}  {:>6.3}  {:>5.1}%  {}",
            topic.topic_num,
            topic.topic_score,
            topic.doc_purity,
            topic.fraction_of_docs * 100.0,
            words,
        );
    }
    println!();
}

/// Display the per-language breakdown of a normalization pass.
pub fn display_normalize_stats(stats: &NormalizeStats) {
    println!("  Documents: {}", stats.documents);
    for (lang, count) in &stats.languages {
        println!("    {lang:<4} {count}");
    }
    if stats.topic_documents > 0 {
        println!(
            "  Topic-normalized: {} ({} left without tokens)",
            stats.topic_documents, stats.empty_topic
        );
    }
}

/// Display what a corpus run produced.
pub fn display_run_summary(outcome: &RunOutcome) {
    println!("\n{}", "Run complete.".bold());
    println!(
        "  Lines read: {}  ({} rejected, {:.1}% kept)",
        outcome.corpus.lines_read,
        outcome.corpus.lines_rejected,
        outcome.corpus.percent_kept()
    );
    display_normalize_stats(&outcome.stats);
    println!(
        "  Counts file: {} ({} documents)",
        outcome.paths.counts_file.display(),
        outcome.counted_documents
    );
    println!("  Id list: {}", outcome.paths.id_list.display());

    match (&outcome.analysis, &outcome.merge) {
        (Some(analysis), Some(report)) => {
            println!("  Summary: {}", analysis.summary_file.display());
            println!("  Probabilities: {}", analysis.probability_file.display());
            println!("  Artifact: {}", outcome.paths.artifact.display());
            display_merge_report(report);
        }
        _ => println!(
            "  {}",
            "Topic estimation skipped; no artifact written.".yellow()
        ),
    }
}

/// One line per merge, flagging anything that did not pair cleanly.
pub fn display_merge_report(report: &MergeReport) {
    if report.is_clean() {
        println!("  {} {} documents paired", "ok".green(), report.paired);
        return;
    }
    println!(
        "  {} {} paired, {} ids without rows, {} rows without ids, {} width mismatches, {} duplicate ids",
        "!".yellow().bold(),
        report.paired,
        report.unpaired_ids,
        report.unpaired_rows,
        report.width_mismatches,
        report.duplicate_ids,
    );
}

/// Display the results of a packaging batch.
pub fn display_package_results(results: &[(PathBuf, MergeReport)]) {
    println!(
        "\n{}",
        format!("=== Packaged {} artifacts ===", results.len()).bold()
    );
    for (path, report) in results {
        println!("  {}", path.display());
        display_merge_report(report);
    }
}

/// Display a record with its fields sorted by name.
pub fn display_record(record: &DocumentRecord) {
    println!("{}", format!("--- {} ---", record.id).bold());
    for (name, value) in record.fields() {
        let value = super::truncate_chars(&value, 160);
        println!("  {:<10} {}", name.cyan(), value);
    }
}
