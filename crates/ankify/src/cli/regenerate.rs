//! The `ankify regenerate` command: replace the image of one card.
//!
//! Asks for a word (unless given with `--word`), finds it in the output CSV,
//! asks for optional extra context, generates a new picture and points the
//! card's `imagePath` at it.

use super::theme::{ankify_theme, print_banner};
use ankify_core::services::{ImageGenerator, ImageOptions};
use ankify_core::{Config, OpenAiProvider, Regenerator};
use clap::Args;
use console::Style;
use dialoguer::Input;
use std::sync::Arc;

/// Arguments for the `regenerate` command.
#[derive(Args, Debug, Default)]
pub struct RegenerateArgs {
    /// Word to regenerate the image for (prompted when omitted)
    #[arg(short, long)]
    pub word: Option<String>,

    /// Extra context for the image prompt (prompted when omitted)
    #[arg(short, long)]
    pub context: Option<String>,
}

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Take the flag value, or ask for it. `None` means the user cancelled.
fn value_or_prompt(
    value: Option<String>,
    prompt: &str,
    allow_empty: bool,
) -> anyhow::Result<Option<String>> {
    if let Some(v) = value {
        return Ok(Some(v));
    }
    handle_interrupt(
        Input::<String>::with_theme(&ankify_theme())
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text(),
    )
}

/// Execute the regenerate command.
pub async fn execute(args: RegenerateArgs, config: Config) -> anyhow::Result<()> {
    let api_key = config.require_api_key()?;
    let output = config.require_output()?;

    let red = Style::new().for_stderr().red();
    let green = Style::new().for_stderr().green();
    let dim = Style::new().for_stderr().dim();

    print_banner("Image Regeneration");

    let prompt = format!(
        "Enter the {} word to regenerate image for",
        config.languages.source
    );
    let Some(word) = value_or_prompt(args.word, &prompt, true)? else {
        return Ok(());
    };
    let word = word.trim().to_string();
    if word.is_empty() {
        eprintln!("  {} No word provided. Exiting.", red.apply_to("✗"));
        return Ok(());
    }

    let provider = Arc::new(OpenAiProvider::new(&api_key, &config.llm));
    let images = ImageGenerator::new(provider, ImageOptions::from_config(&config));
    let regenerator = Regenerator::new(images, &output, &config.languages.source);

    eprintln!("  Searching for {word:?} in {}...", output.display());
    let Some(card) = regenerator.lookup(&word)? else {
        eprintln!(
            "  {} Word {word:?} not found in the output file.",
            red.apply_to("✗")
        );
        eprintln!(
            "  {}",
            dim.apply_to(
                "Make sure you've run the main processing first and the word exists in the CSV."
            )
        );
        return Ok(());
    };

    eprintln!("  {} Found word: {}", green.apply_to("✓"), card.articled_word);
    eprintln!("     Translation: {}", card.translation);
    eprintln!("     Example: {}", card.example_sentence);
    eprintln!();

    let Some(context) = value_or_prompt(
        args.context,
        "Enter custom context for the image (optional)",
        true,
    )?
    else {
        return Ok(());
    };

    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Using prompt: {}",
            regenerator.prompt_for(&card, &context)
        ))
    );
    eprintln!("  Generating new image...");

    let image_file = regenerator.regenerate(&card, &context).await?;

    eprintln!(
        "  {} New image generated: {}",
        green.apply_to("✓"),
        image_file.display()
    );
    eprintln!("  {} Image regeneration complete!", green.apply_to("✓"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_value_skips_prompt() {
        let value = value_or_prompt(Some("hund".to_string()), "unused", false).unwrap();
        assert_eq!(value.as_deref(), Some("hund"));
    }

    #[tokio::test]
    async fn missing_output_is_fatal() {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        let err = execute(RegenerateArgs::default(), config).await.unwrap_err();
        assert!(err.to_string().contains("OUTPUT_CSV_PATH"));
    }

    #[tokio::test]
    async fn unknown_word_leaves_csv_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("cards.csv");
        let card = ankify_core::CardRecord {
            articled_word: "der Hund".to_string(),
            image_path: "images/old.png".to_string(),
            ..Default::default()
        };
        ankify_core::vocab::write_cards(&output, &[card]).unwrap();
        let before = std::fs::read_to_string(&output).unwrap();

        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();
        config.paths.output_csv = Some(output.clone());
        config.paths.images_dir = tmp.path().join("images");
        let args = RegenerateArgs {
            word: Some("vogel".to_string()),
            context: Some(String::new()),
        };

        execute(args, config).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), before);
    }
}
