//! Row-by-row enrichment pipeline.
//!
//! ```text
//! VocabEntry → sanitize → example sentence? → translations? → image
//!            → [cloze | alternatives | forms | part of speech | article] → CardRecord
//! ```
//!
//! Rows are processed strictly one after another; only the five annotation
//! calls within a row run concurrently.

use crate::config::{Config, ErrorMode};
use crate::error::{AnkifyError, ServiceError};
use crate::llm::{ChatProvider, Completer, ImageProvider};
use crate::paths::{parent_dir, relative_to};
use crate::services::{
    ContentGenerator, Enhancer, FallbackPolicy, ImageGenerator, ImageOptions, Translator,
};
use crate::types::{CardRecord, RunReport, VocabEntry};
use crate::vocab;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The services one pipeline drives.
#[derive(Clone)]
pub struct Services {
    pub content: ContentGenerator,
    pub translator: Translator,
    pub enhancer: Enhancer,
    /// `None` disables image generation
    pub images: Option<ImageGenerator>,
    /// Shared by the text services; read for token usage
    pub completer: Completer,
}

impl Services {
    /// Build all services from config on top of the given providers.
    pub fn from_config(
        config: &Config,
        chat: Arc<dyn ChatProvider>,
        images: Arc<dyn ImageProvider>,
    ) -> Self {
        let completer = Completer::new(chat, &config.llm);
        let images = config
            .pipeline
            .generate_images
            .then(|| ImageGenerator::new(images, ImageOptions::from_config(config)));
        Self {
            content: ContentGenerator::new(completer.clone(), &config.languages.source),
            translator: Translator::new(completer.clone(), &config.languages),
            enhancer: Enhancer::new(completer.clone(), &config.languages),
            images,
            completer,
        }
    }
}

/// A processed row.
#[derive(Debug, Clone)]
pub struct ProcessedRow {
    pub card: CardRecord,
    /// Absolute or cwd-relative location of the saved image, if any
    pub image_file: Option<PathBuf>,
}

/// Sequential enrichment of vocabulary rows into cards.
pub struct Pipeline {
    services: Services,
    policy: FallbackPolicy,
    output_dir: PathBuf,
}

impl Pipeline {
    /// `output_csv` is where cards will be written; image paths are stored
    /// relative to its directory.
    pub fn new(services: Services, mode: ErrorMode, output_csv: &Path) -> Self {
        Self {
            services,
            policy: FallbackPolicy::new(mode),
            output_dir: parent_dir(output_csv),
        }
    }

    /// Enrich a single row.
    pub async fn process_entry(&self, entry: &VocabEntry) -> Result<ProcessedRow, ServiceError> {
        let mut word = vocab::sanitize(entry);

        if word.example_sentence.is_empty() && !word.name.is_empty() {
            let generated = self
                .services
                .content
                .generate_example_sentence(&word.name)
                .await;
            word.example_sentence = self
                .policy
                .resolve("example sentence", generated, String::new)?;
        }

        let word = self
            .services
            .translator
            .ensure_translation(&word, &self.policy)
            .await?;

        let image_file = match &self.services.images {
            Some(images) => {
                let generated = images
                    .generate(&word.name, &word.example_sentence)
                    .await
                    .map(Some);
                self.policy.resolve("image", generated, || None)?
            }
            None => None,
        };

        let extras = self.services.enhancer.enhance(&word, &self.policy).await?;

        let image_path = image_file
            .as_deref()
            .map(|p| relative_to(p, &self.output_dir).to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ProcessedRow {
            card: CardRecord {
                articled_word: extras.articled_word,
                translation: word.translation,
                example_sentence: word.example_sentence,
                cloze_sentence: extras.cloze_sentence,
                example_sentence_translation: word.example_sentence_translation,
                alternative_words: extras.alternative_words,
                inflected_forms: extras.inflected_forms,
                part_of_speech: extras.part_of_speech,
                image_path,
            },
            image_file,
        })
    }

    /// Enrich every row in order.
    ///
    /// `on_row` is called with the row index and entry before each row, and
    /// is meant for progress reporting. Lenient mode resolves every failed
    /// call to its field fallback, so every row yields a card there; a row
    /// error can only come from strict mode and aborts the run.
    pub async fn run<F>(
        &self,
        entries: &[VocabEntry],
        mut on_row: F,
    ) -> Result<(Vec<CardRecord>, RunReport), AnkifyError>
    where
        F: FnMut(usize, &VocabEntry),
    {
        let mut cards = Vec::with_capacity(entries.len());
        let mut report = RunReport::default();

        for (idx, entry) in entries.iter().enumerate() {
            on_row(idx, entry);
            tracing::info!(
                "Processing word {}/{}: {}",
                idx + 1,
                entries.len(),
                entry.name
            );

            let row = self.process_entry(entry).await.map_err(|e| {
                tracing::error!("Error processing word {:?}: {e}", entry.name);
                AnkifyError::from(e)
            })?;
            if row.image_file.is_some() {
                report.images += 1;
            }
            report.processed += 1;
            cards.push(row.card);
            tracing::info!("Processed: {}", entry.name);
        }

        report.fallbacks = self.policy.used();
        report.tokens = self.services.completer.tokens_used();
        Ok((cards, report))
    }
}

#[cfg(test)]
mod tests;
