//! Reading vocabulary CSVs and writing card CSVs.
//!
//! Input files may start with a UTF-8 byte order mark (spreadsheet exports
//! often do); it is stripped before parsing. Blank lines are skipped.

use crate::error::VocabError;
use crate::types::{CardRecord, VocabEntry};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Raw input row. The word column may be called `Word` or `Name`.
#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "Word", alias = "Name", default)]
    word: String,
    #[serde(rename = "Translation", default)]
    translation: String,
    #[serde(rename = "Example sentence", default)]
    example_sentence: String,
    #[serde(rename = "Example sentence translation", default)]
    example_sentence_translation: String,
}

fn read_without_bom(path: &Path) -> Result<String, VocabError> {
    let content = fs::read_to_string(path).map_err(|source| VocabError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Every record must have as many fields as the header; a stray unquoted
/// comma is a parse error, not a shifted row.
fn reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new().from_reader(content.as_bytes())
}

/// Read and validate the vocabulary CSV.
///
/// Fails on an unreadable or malformed file, or on a row whose word is empty.
pub fn read_entries(path: &Path) -> Result<Vec<VocabEntry>, VocabError> {
    let content = read_without_bom(path)?;
    let mut entries = Vec::new();

    for (idx, row) in reader(&content).deserialize::<InputRow>().enumerate() {
        let row = row.map_err(|source| VocabError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if row.word.trim().is_empty() {
            return Err(VocabError::MissingWord {
                path: path.to_path_buf(),
                row: idx + 1,
            });
        }
        entries.push(VocabEntry {
            name: row.word,
            translation: row.translation,
            example_sentence: row.example_sentence,
            example_sentence_translation: row.example_sentence_translation,
        });
    }

    Ok(entries)
}

/// Read a previously written card CSV.
pub fn read_cards(path: &Path) -> Result<Vec<CardRecord>, VocabError> {
    let content = read_without_bom(path)?;
    let cards = reader(&content)
        .deserialize::<CardRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| VocabError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(cards)
}

/// Write cards with a header row, creating parent directories as needed.
pub fn write_cards(path: &Path, cards: &[CardRecord]) -> Result<(), VocabError> {
    let io_err = |source| VocabError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| VocabError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(CardRecord::HEADERS).map_err(csv_err)?;
    for card in cards {
        writer.serialize(card).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Normalize casing: trim the word and translation and lowercase their
/// first character.
pub fn sanitize(entry: &VocabEntry) -> VocabEntry {
    VocabEntry {
        name: uncapitalize(&entry.name),
        translation: uncapitalize(&entry.translation),
        ..entry.clone()
    }
}

fn uncapitalize(s: &str) -> String {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
