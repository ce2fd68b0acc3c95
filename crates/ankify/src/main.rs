//! Ankify CLI - turn vocabulary lists into enriched flashcard CSVs.
//!
//! Reads a CSV of words, fills in missing translations and example
//! sentences, adds grammatical annotations and a generated picture per word,
//! and writes a CSV ready for flashcard import.
//!
//! # Usage
//!
//! ```bash
//! # Enrich the CSV named by INPUT_CSV_PATH into OUTPUT_CSV_PATH
//! ankify process
//!
//! # Override paths and abort on the first failed call
//! ankify process --input words.csv --output out/cards.csv --strict
//!
//! # Pick a new picture for one word
//! ankify regenerate
//!
//! # View configuration
//! ankify config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Ankify - turn vocabulary lists into enriched flashcard CSVs.
#[derive(Parser, Debug)]
#[command(name = "ankify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Defaults to `process` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Enrich the vocabulary CSV and write the card CSV
    Process(cli::process::ProcessArgs),

    /// Regenerate the image of one word in the card CSV
    Regenerate(cli::regenerate::RegenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values in .env behave like real environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = ankify_core::Config::load().with_context(|| {
        format!(
            "Failed to load configuration (config file: {})",
            ankify_core::Config::default_path().display()
        )
    })?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Ankify v{}", ankify_core::VERSION);

    match cli.command {
        Some(Commands::Process(args)) => cli::process::execute(args, config).await,
        None => cli::process::execute(Default::default(), config).await,
        Some(Commands::Regenerate(args)) => cli::regenerate::execute(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args, config).await,
    }
}
