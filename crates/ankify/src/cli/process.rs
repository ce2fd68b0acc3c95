//! The `ankify process` command: enrich a vocabulary CSV.

use ankify_core::{vocab, Config, ErrorMode, OpenAiProvider, Pipeline, RunReport, Services};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the `process` command.
///
/// Every flag overrides the matching config/environment value.
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Vocabulary CSV to read [env: INPUT_CSV_PATH]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Card CSV to write [env: OUTPUT_CSV_PATH]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Root directory for generated images [env: IMAGES_DIR]
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    /// Language of the vocabulary [env: SOURCE_LANGUAGE]
    #[arg(long)]
    pub source_language: Option<String>,

    /// Language to translate into [env: TARGET_LANGUAGE]
    #[arg(long)]
    pub target_language: Option<String>,

    /// Chat model name [env: ANKIFY_CHAT_MODEL]
    #[arg(long)]
    pub chat_model: Option<String>,

    /// Abort the whole run on the first failed call
    #[arg(long)]
    pub strict: bool,

    /// Skip image generation
    #[arg(long)]
    pub no_images: bool,

    /// Process only the first N words
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ProcessArgs {
    /// Fold command-line overrides into the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref input) = self.input {
            config.paths.input_csv = Some(input.clone());
        }
        if let Some(ref output) = self.output {
            config.paths.output_csv = Some(output.clone());
        }
        if let Some(ref dir) = self.images_dir {
            config.paths.images_dir = dir.clone();
        }
        if let Some(ref lang) = self.source_language {
            config.languages.source = lang.clone();
        }
        if let Some(ref lang) = self.target_language {
            config.languages.target = lang.clone();
        }
        if let Some(ref model) = self.chat_model {
            config.llm.chat_model = model.clone();
        }
        if self.strict {
            config.pipeline.error_mode = ErrorMode::Strict;
        }
        if self.no_images {
            config.pipeline.generate_images = false;
        }
    }
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let api_key = config.require_api_key()?;
    let input = config.require_input()?;
    let output = config.require_output()?;

    tracing::info!("Reading and processing CSV file...");
    let mut entries = vocab::read_entries(&input).context("Error reading CSV file")?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }
    tracing::info!("Found {} words to process", entries.len());

    let provider = Arc::new(OpenAiProvider::new(&api_key, &config.llm));
    let services = Services::from_config(&config, provider.clone(), provider);
    let pipeline = Pipeline::new(services, config.pipeline.error_mode, &output);

    let pb = create_progress_bar(entries.len() as u64);
    let result = pipeline
        .run(&entries, |idx, entry| {
            pb.set_position(idx as u64);
            pb.set_message(entry.name.clone());
        })
        .await;
    pb.finish_and_clear();

    let (cards, report) = result?;

    vocab::write_cards(&output, &cards).context("Error writing CSV file")?;
    log_report(&report);

    println!("Processing complete! Output written to {}", output.display());
    if config.pipeline.generate_images {
        let images_dir = config.images_dir();
        let shown = std::path::absolute(&images_dir).unwrap_or(images_dir);
        tracing::info!("Images saved to: {}", shown.display());
    }

    Ok(())
}

fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}

fn log_report(report: &RunReport) {
    if report.fallbacks > 0 {
        tracing::warn!(
            "{} words processed, {} fields fell back to defaults, {} images, {} tokens",
            report.processed,
            report.fallbacks,
            report.images,
            report.tokens
        );
    } else {
        tracing::info!(
            "{} words processed, {} images, {} tokens",
            report.processed,
            report.images,
            report.tokens
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_change_nothing() {
        let mut config = Config::default();
        ProcessArgs::default().apply(&mut config);
        assert!(config.paths.input_csv.is_none());
        assert_eq!(config.pipeline.error_mode, ErrorMode::Lenient);
        assert!(config.pipeline.generate_images);
    }

    #[test]
    fn flags_override_config() {
        let args = ProcessArgs {
            input: Some(PathBuf::from("words.csv")),
            output: Some(PathBuf::from("out/cards.csv")),
            target_language: Some("English".to_string()),
            strict: true,
            no_images: true,
            ..ProcessArgs::default()
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.require_input().unwrap(), PathBuf::from("words.csv"));
        assert_eq!(
            config.require_output().unwrap(),
            PathBuf::from("out/cards.csv")
        );
        assert_eq!(config.languages.target, "English");
        assert_eq!(config.languages.source, "German");
        assert_eq!(config.pipeline.error_mode, ErrorMode::Strict);
        assert!(!config.pipeline.generate_images);
    }

    #[tokio::test]
    async fn missing_input_is_fatal() {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        let err = execute(ProcessArgs::default(), config).await.unwrap_err();
        assert!(err.to_string().contains("INPUT_CSV_PATH"));
    }

    #[tokio::test]
    async fn unreadable_input_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        let args = ProcessArgs {
            input: Some(tmp.path().join("missing.csv")),
            output: Some(tmp.path().join("cards.csv")),
            ..ProcessArgs::default()
        };
        let err = execute(args, config).await.unwrap_err();
        assert!(err.to_string().contains("Error reading CSV file"));
        assert!(!tmp.path().join("cards.csv").exists());
    }

    #[tokio::test]
    async fn strict_abort_writes_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("words.csv");
        std::fs::write(&input, "Word,Translation\nHund,\n").unwrap();
        let output = tmp.path().join("out/cards.csv");

        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        config.llm.endpoint = "http://127.0.0.1:9/v1".to_string();
        config.llm.timeout_ms = 5_000;
        let args = ProcessArgs {
            input: Some(input),
            output: Some(output.clone()),
            images_dir: Some(tmp.path().join("out/images")),
            strict: true,
            ..ProcessArgs::default()
        };

        assert!(execute(args, config).await.is_err());
        assert!(!output.exists());
        assert!(!tmp.path().join("out").exists());
    }
}
