//! Regenerating the image of a single card in an existing output CSV.
//!
//! The output CSV is the only state: the card is looked up in it, a new
//! image is generated, and the card's `imagePath` is rewritten in place.

use crate::error::AnkifyError;
use crate::llm::prompts;
use crate::paths::{parent_dir, relative_to};
use crate::services::ImageGenerator;
use crate::types::CardRecord;
use crate::vocab;
use std::path::{Path, PathBuf};

/// Leading articles ignored when matching a query.
const ARTICLES: [&str; 3] = ["der ", "die ", "das "];

/// Find the first card matching `query`, case-insensitively: an exact match,
/// a card containing the query, or a card equal to the query once its leading
/// article is removed.
pub fn find_card<'a>(cards: &'a [CardRecord], query: &str) -> Option<&'a CardRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    cards.iter().find(|card| {
        let word = card.articled_word.to_lowercase();
        !word.is_empty()
            && (word == query || word.contains(&query) || strip_article(&word) == query)
    })
}

fn strip_article(word: &str) -> &str {
    ARTICLES
        .iter()
        .find_map(|article| word.strip_prefix(article))
        .map(str::trim_start)
        .unwrap_or(word)
}

/// Looks up cards in an output CSV and replaces their images.
pub struct Regenerator {
    images: ImageGenerator,
    output_csv: PathBuf,
    language: String,
}

impl Regenerator {
    pub fn new(images: ImageGenerator, output_csv: &Path, language: &str) -> Self {
        Self {
            images,
            output_csv: output_csv.to_path_buf(),
            language: language.to_string(),
        }
    }

    /// Find the card for `query` in the output CSV.
    pub fn lookup(&self, query: &str) -> Result<Option<CardRecord>, AnkifyError> {
        let cards = vocab::read_cards(&self.output_csv)?;
        Ok(find_card(&cards, query).cloned())
    }

    /// Prompt that will be used for `card`.
    pub fn prompt_for(&self, card: &CardRecord, custom_context: &str) -> String {
        prompts::regenerated_image(
            &card.articled_word,
            &card.example_sentence,
            custom_context.trim(),
            &self.language,
            self.images.style(),
        )
    }

    /// Generate a new image for `card` and point its CSV row at it.
    ///
    /// Returns the path of the new image file.
    pub async fn regenerate(
        &self,
        card: &CardRecord,
        custom_context: &str,
    ) -> Result<PathBuf, AnkifyError> {
        let prompt = self.prompt_for(card, custom_context);
        tracing::debug!("Using prompt: {prompt}");

        let image_file = self
            .images
            .generate_with_prompt(&card.articled_word, &prompt)
            .await?;
        self.update_image_path(&card.articled_word, &image_file)?;
        Ok(image_file)
    }

    /// Rewrite the `imagePath` of every row whose word equals `word`.
    ///
    /// Returns whether any row was updated; the file is untouched otherwise.
    pub fn update_image_path(&self, word: &str, image_file: &Path) -> Result<bool, AnkifyError> {
        let mut cards = vocab::read_cards(&self.output_csv)?;
        let relative = relative_to(image_file, &parent_dir(&self.output_csv))
            .to_string_lossy()
            .into_owned();

        let mut updated = false;
        for card in cards.iter_mut().filter(|c| c.articled_word == word) {
            card.image_path = relative.clone();
            updated = true;
        }

        if updated {
            vocab::write_cards(&self.output_csv, &cards)?;
            tracing::info!("Updated CSV with new image path");
        } else {
            tracing::warn!("No row for {word:?} in {:?}", self.output_csv);
        }
        Ok(updated)
    }
}
