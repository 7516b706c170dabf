use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topictag::config::Config;
use topictag::ingest::reader::FieldFilter;
use topictag::ingest::schema::RecordSchema;

/// topictag: normalize microloan and journal text and package topic models.
///
/// Turns a raw tab-separated corpus into a counts file for the PLSA topic
/// estimator, and merges the estimator's reports into one JSON artifact.
#[derive(Parser)]
#[command(name = "topictag", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for values normally read from the environment.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Directory holding the estimator binaries
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Scratch directory for counts, feature, and model files
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Stop-word list passed to the estimator
    #[arg(long)]
    stop_list: Option<PathBuf>,

    /// Number of topics to estimate
    #[arg(long)]
    num_topics: Option<u32>,

    /// Language code of the documents to topic-model (e.g. en)
    #[arg(long)]
    lang: Option<String>,
}

impl ConfigArgs {
    fn apply(self, mut config: Config) -> Result<Config> {
        if let Some(dir) = self.bin_dir {
            config.bin_dir = dir;
        }
        if let Some(dir) = self.temp_dir {
            config.temp_dir = dir;
        }
        if let Some(path) = self.stop_list {
            config.stop_list = Some(path);
        }
        if let Some(k) = self.num_topics {
            if k == 0 {
                anyhow::bail!("--num-topics must be at least 1");
            }
            config.num_topics = k;
        }
        if let Some(lang) = self.lang {
            config.lang_filter = lang;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a corpus, estimate topics, and write the JSON artifact
    Run {
        /// Raw tab-separated corpus file
        input: PathBuf,

        /// Column layout of the input
        #[arg(long, value_enum, default_value = "simple")]
        schema: RecordSchema,

        /// Directory for the id list, estimator reports, and artifact
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Normalize a corpus and write the counts file, without estimating
    Normalize {
        /// Raw tab-separated corpus file
        input: PathBuf,

        #[arg(long, value_enum, default_value = "simple")]
        schema: RecordSchema,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Package every loan/journal topic run found in a data directory
    Package {
        /// Directory holding the id lists, summaries, and probability files
        data_dir: PathBuf,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },

    /// Package a single id list, summary, and probability matrix
    PackageOne {
        #[arg(long)]
        ids: PathBuf,

        #[arg(long)]
        summary: PathBuf,

        #[arg(long)]
        probabilities: PathBuf,

        /// Artifact path (e.g. output/loan_50_topics.json)
        #[arg(long)]
        output: PathBuf,
    },

    /// Normalize a corpus and print its records
    Show {
        input: PathBuf,

        #[arg(long, value_enum, default_value = "simple")]
        schema: RecordSchema,

        /// Only show records whose field matches, e.g. lang_code=en
        #[arg(long)]
        filter: Option<FieldFilter>,

        /// Max records to print (default: 20)
        #[arg(long, default_value = "20")]
        limit: usize,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print a topic summary report
    Summary {
        /// Summary report written by the estimator
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topictag=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            schema,
            output_dir,
            config,
        } => {
            let config = config.apply(Config::load()?)?;
            config.require_estimator()?;
            config.require_stop_list()?;

            let options = topictag::pipeline::run::RunOptions {
                input,
                schema,
                output_dir,
            };
            let estimator = topictag::estimator::plsa::PlsaBinary {
                bin_dir: config.bin_dir.clone(),
                work_dir: config.temp_dir.clone(),
                output_dir: options.output_dir.clone(),
                prefix: topictag::pipeline::run::file_prefix(&options.input),
            };

            println!("Running topic pipeline on {}...", options.input.display());
            let normalizer = build_normalizer()?;
            let identifier = topictag::langid::stopwords::StopWordIdentifier::new();
            let outcome = topictag::pipeline::run::run(
                &config,
                &options,
                &normalizer,
                &identifier,
                &estimator,
            )?;

            topictag::output::terminal::display_run_summary(&outcome);
            if let Some(analysis) = &outcome.analysis {
                let topics =
                    topictag::packager::readers::read_topic_summary(&analysis.summary_file)?;
                topictag::output::terminal::display_topic_summary(&topics);
            }
        }

        Commands::Normalize {
            input,
            schema,
            output_dir,
            config,
        } => {
            let config = config.apply(Config::load()?)?;
            let options = topictag::pipeline::run::RunOptions {
                input,
                schema,
                output_dir,
            };

            println!("Normalizing {}...", options.input.display());
            let normalizer = build_normalizer()?;
            let identifier = topictag::langid::stopwords::StopWordIdentifier::new();
            let outcome =
                topictag::pipeline::run::prepare(&config, &options, &normalizer, &identifier)?;

            topictag::output::terminal::display_run_summary(&outcome);
            println!(
                "{}",
                "Run `topictag run` with the estimator installed to build topics.".dimmed()
            );
        }

        Commands::Package {
            data_dir,
            output_dir,
        } => {
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating output directory {}", output_dir.display()))?;
            let jobs = topictag::packager::batch::plan(
                &data_dir,
                &output_dir,
                &topictag::packager::batch::DEFAULT_CORPORA,
                &topictag::packager::batch::DEFAULT_TOPIC_COUNTS,
            );
            info!(jobs = jobs.len(), data_dir = %data_dir.display(), "Packaging topic runs");
            let results = topictag::packager::batch::package_all(&jobs)?;
            topictag::output::terminal::display_package_results(&results);
        }

        Commands::PackageOne {
            ids,
            summary,
            probabilities,
            output,
        } => {
            let job = topictag::packager::batch::PackageJob {
                id_list: ids,
                summary,
                probabilities,
                output,
            };
            let report = job.run()?;
            topictag::output::terminal::display_package_results(&[(job.output, report)]);
        }

        Commands::Show {
            input,
            schema,
            filter,
            limit,
            config,
        } => {
            let config = config.apply(Config::load()?)?;
            let mut corpus = topictag::ingest::reader::read_raw_file(&input, schema)?;
            let normalizer = build_normalizer()?;
            let identifier = topictag::langid::stopwords::StopWordIdentifier::new();
            topictag::pipeline::normalize::normalize_corpus(
                &mut corpus,
                &normalizer,
                &identifier,
                Some(config.lang_filter.as_str()),
            )?;

            let mut shown = 0;
            for record in corpus.matching(filter.as_ref()).take(limit) {
                topictag::output::terminal::display_record(record);
                shown += 1;
            }
            if shown == 0 {
                println!("No records matched.");
            }
        }

        Commands::Summary { file } => {
            let topics = topictag::packager::readers::read_topic_summary(&file)?;
            topictag::output::terminal::display_topic_summary(&topics);
        }
    }

    Ok(())
}

/// Compile every normalization stage once for the whole run.
fn build_normalizer() -> Result<topictag::normalize::Normalizer> {
    topictag::normalize::Normalizer::new(topictag::normalize::rewrite::RewriteTable::new())
}
