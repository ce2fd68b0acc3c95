//! Word and sentence translation.

use super::FallbackPolicy;
use crate::config::LanguagesConfig;
use crate::error::ServiceError;
use crate::llm::{prompts, Completer};
use crate::types::VocabEntry;

/// Translates words and example sentences from the source to the target
/// language.
#[derive(Clone)]
pub struct Translator {
    completer: Completer,
    languages: LanguagesConfig,
}

impl Translator {
    pub fn new(completer: Completer, languages: &LanguagesConfig) -> Self {
        Self {
            completer,
            languages: languages.clone(),
        }
    }

    /// Translate a single word; may return up to five comma-separated
    /// alternatives. Fallback: empty string.
    pub async fn translate_word(&self, word: &str) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "word translation",
                prompts::translate_word(word, &self.languages.source, &self.languages.target),
            )
            .await
    }

    /// Translate a sentence, rendering `original_word` as `translations`.
    /// Fallback: empty string.
    pub async fn translate_text(
        &self,
        text: &str,
        original_word: &str,
        translations: &str,
    ) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "text translation",
                prompts::translate_text(
                    text,
                    &self.languages.source,
                    &self.languages.target,
                    original_word,
                    translations,
                ),
            )
            .await
    }

    /// Fill the translation and example sentence translation when missing.
    ///
    /// The word is translated first so the sentence translation can reuse it.
    pub async fn ensure_translation(
        &self,
        entry: &VocabEntry,
        policy: &FallbackPolicy,
    ) -> Result<VocabEntry, ServiceError> {
        let mut result = entry.clone();

        if result.translation.is_empty() && !result.name.is_empty() {
            let translated = self.translate_word(&result.name).await;
            result.translation = policy.resolve("word translation", translated, String::new)?;
        }

        if result.example_sentence_translation.is_empty() && !result.example_sentence.is_empty() {
            let translated = self
                .translate_text(&result.example_sentence, &result.name, &result.translation)
                .await;
            result.example_sentence_translation =
                policy.resolve("sentence translation", translated, String::new)?;
        }

        Ok(result)
    }
}
