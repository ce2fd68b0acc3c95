//! Flashcard annotations derived from a word and its example sentence.
//!
//! The five annotations are independent, so [`Enhancer::enhance`] issues
//! them concurrently and waits for all of them.

use super::FallbackPolicy;
use crate::config::{ErrorMode, LanguagesConfig};
use crate::error::ServiceError;
use crate::llm::{prompts, Completer};
use crate::types::VocabEntry;

/// The auxiliary fields produced for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enhancements {
    pub cloze_sentence: String,
    pub alternative_words: String,
    pub inflected_forms: String,
    pub part_of_speech: String,
    pub articled_word: String,
}

/// Produces cloze sentences, alternatives, inflections, part of speech and
/// article-annotated words.
#[derive(Clone)]
pub struct Enhancer {
    completer: Completer,
    languages: LanguagesConfig,
}

impl Enhancer {
    pub fn new(completer: Completer, languages: &LanguagesConfig) -> Self {
        Self {
            completer,
            languages: languages.clone(),
        }
    }

    /// Replace `word` in `sentence` with `***`. An empty sentence stays empty
    /// without a model call.
    pub async fn cloze_sentence(&self, sentence: &str, word: &str) -> Result<String, ServiceError> {
        if sentence.is_empty() {
            return Ok(String::new());
        }
        self.completer
            .complete(
                "cloze sentence",
                prompts::cloze_sentence(sentence, word, &self.languages.source),
            )
            .await
    }

    /// Source-language words that translate to `translation`. An empty
    /// translation yields no alternatives without a model call.
    pub async fn alternatives(&self, translation: &str) -> Result<String, ServiceError> {
        if translation.is_empty() {
            return Ok(String::new());
        }
        self.completer
            .complete(
                "alternatives",
                prompts::alternatives(translation, &self.languages.source, &self.languages.target),
            )
            .await
    }

    pub async fn inflected_forms(&self, word: &str) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "inflected forms",
                prompts::inflected_forms(word, &self.languages.source),
            )
            .await
    }

    pub async fn part_of_speech(&self, word: &str) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "part of speech",
                prompts::part_of_speech(word, &self.languages.source),
            )
            .await
    }

    pub async fn articled_word(&self, word: &str) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "articled word",
                prompts::articled_word(word, &self.languages.source),
            )
            .await
    }

    /// Run all five annotations for `entry` concurrently.
    ///
    /// In strict mode the first failure aborts the joint wait. In lenient
    /// mode every call runs to completion and failures get their fallback.
    pub async fn enhance(
        &self,
        entry: &VocabEntry,
        policy: &FallbackPolicy,
    ) -> Result<Enhancements, ServiceError> {
        let word = entry.name.as_str();
        let sentence = entry.example_sentence.as_str();

        match policy.mode() {
            ErrorMode::Strict => {
                let (cloze_sentence, alternative_words, inflected_forms, part_of_speech, articled_word) =
                    tokio::try_join!(
                        self.cloze_sentence(sentence, word),
                        self.alternatives(&entry.translation),
                        self.inflected_forms(word),
                        self.part_of_speech(word),
                        self.articled_word(word),
                    )?;
                Ok(Enhancements {
                    cloze_sentence,
                    alternative_words,
                    inflected_forms,
                    part_of_speech,
                    articled_word,
                })
            }
            ErrorMode::Lenient => {
                let (cloze, alternatives, forms, pos, articled) = tokio::join!(
                    self.cloze_sentence(sentence, word),
                    self.alternatives(&entry.translation),
                    self.inflected_forms(word),
                    self.part_of_speech(word),
                    self.articled_word(word),
                );
                Ok(Enhancements {
                    cloze_sentence: policy.resolve("cloze sentence", cloze, || {
                        cloze_fallback(sentence, word)
                    })?,
                    alternative_words: policy.resolve("alternatives", alternatives, String::new)?,
                    inflected_forms: policy.resolve("inflected forms", forms, String::new)?,
                    part_of_speech: policy.resolve("part of speech", pos, String::new)?,
                    articled_word: policy.resolve("articled word", articled, || word.to_string())?,
                })
            }
        }
    }
}

/// Case-insensitive literal replacement of `word` with `***`.
pub fn cloze_fallback(sentence: &str, word: &str) -> String {
    if word.is_empty() {
        return sentence.to_string();
    }
    match regex::RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(sentence, "***").into_owned(),
        Err(_) => sentence.to_string(),
    }
}
