//! Core data types for vocabulary rows and generated cards.

use serde::{Deserialize, Serialize};

/// One vocabulary word as read from the input CSV.
///
/// Optional columns are empty strings when absent; the pipeline fills them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabEntry {
    /// The word itself (required, non-empty)
    pub name: String,
    pub translation: String,
    pub example_sentence: String,
    pub example_sentence_translation: String,
}

impl VocabEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One enriched output row.
///
/// Field order and renames define the output CSV header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRecord {
    /// The word with its article when it is a noun
    #[serde(rename = "Word")]
    pub articled_word: String,

    #[serde(rename = "Translation")]
    pub translation: String,

    #[serde(rename = "Sample sentence")]
    pub example_sentence: String,

    /// Example sentence with the word replaced by `***`
    #[serde(rename = "Sample sentence without the word")]
    pub cloze_sentence: String,

    #[serde(rename = "Sample sentence translation")]
    pub example_sentence_translation: String,

    /// Source-language words that share the translation
    #[serde(rename = "Alternatives")]
    pub alternative_words: String,

    #[serde(rename = "Plural and inflected forms")]
    pub inflected_forms: String,

    #[serde(rename = "Part of Speech")]
    pub part_of_speech: String,

    /// Image path relative to the CSV's directory, or empty
    #[serde(rename = "imagePath")]
    pub image_path: String,
}

impl CardRecord {
    /// Output CSV header, in column order.
    pub const HEADERS: [&'static str; 9] = [
        "Word",
        "Translation",
        "Sample sentence",
        "Sample sentence without the word",
        "Sample sentence translation",
        "Alternatives",
        "Plural and inflected forms",
        "Part of Speech",
        "imagePath",
    ];
}

/// Summary of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows that produced an output record
    pub processed: usize,
    /// Fields that received their fallback value
    pub fallbacks: usize,
    /// Images successfully written to disk
    pub images: usize,
    /// Chat tokens reported by the provider
    pub tokens: u64,
}
