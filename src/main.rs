//! verse-annotate CLI
//!
//! - `annotate`: annotate a directory of normalized poem records
//! - `line`: annotate a single line and print the record

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verse_annotate::{
    annotate_corpus, AnnotateError, Annotator, AnnotatorConfig, CorpusOptions, Lexicon,
    NormalizedPoem, Result,
};

/// Phonological, metrical, and structural annotation of English verse
#[derive(Parser)]
#[command(name = "verse-annotate")]
#[command(version, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every *.json poem record in a directory
    Annotate {
        /// Directory of normalized poem records
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for annotated records
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        lexicon: LexiconArgs,

        /// Annotate at most this many poems (existing outputs do not count with --skip-existing)
        #[arg(long)]
        limit: Option<usize>,

        /// Leave poems whose output already exists
        #[arg(long)]
        skip_existing: bool,

        /// Also write the run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Annotate a single line of verse
    Line {
        /// The line text
        text: String,

        #[command(flatten)]
        lexicon: LexiconArgs,
    },
}

#[derive(Args)]
struct LexiconArgs {
    /// CMU-format pronouncing dictionary
    #[arg(short, long, env = "VERSE_ANNOTATE_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// JSON override table, layered over the built-in archaic forms
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// JSON annotator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LexiconArgs {
    fn annotator(&self) -> Result<Annotator> {
        let config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| AnnotateError::io(path, &e))?;
                AnnotatorConfig::from_json(&json)?
            }
            None => AnnotatorConfig::default(),
        };
        if self.dictionary.is_none() {
            tracing::warn!("no dictionary given; only overrides and the fallback synthesizer are available");
        }
        let lexicon = Lexicon::load(self.dictionary.as_deref(), self.overrides.as_deref())?;
        Annotator::new(lexicon, config)
    }
}

fn write_json(path: &Path, json: &str) -> Result<()> {
    fs::write(path, format!("{json}\n")).map_err(|e| AnnotateError::io(path, &e))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Annotate {
            input,
            output,
            lexicon,
            limit,
            skip_existing,
            report,
        } => {
            let annotator = lexicon.annotator()?;
            let options = CorpusOptions {
                limit,
                skip_existing,
            };
            let run_report = annotate_corpus(&annotator, &input, &output, &options)?;
            let json = serde_json::to_string_pretty(&run_report)?;
            if let Some(path) = report {
                write_json(&path, &json)?;
            }
            println!("{json}");
        }
        Commands::Line { text, lexicon } => {
            let annotator = lexicon.annotator()?;
            let poem = NormalizedPoem::from_text("line", &[vec![text]]);
            let annotated = annotator
                .annotate_poem(&poem)
                .map_err(|failure| AnnotateError::empty_input(failure.to_string()))?;
            println!("{}", serde_json::to_string_pretty(&annotated)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
