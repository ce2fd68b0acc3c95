//! Error types for the Ankify enrichment pipeline.
//!
//! Errors are organized by concern so that messages carry the context a
//! user needs to act on them (file paths, row numbers, HTTP status).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Ankify operations.
#[derive(Error, Debug)]
pub enum AnkifyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading or writing vocabulary CSV files
    #[error("CSV error: {0}")]
    Vocab(#[from] VocabError),

    /// A model or image call failed (only surfaces in strict mode)
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A required setting is absent
    #[error("{name} is required (set it in the environment or a .env file)")]
    Missing { name: &'static str },

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors reading or writing the vocabulary and card CSV files.
#[derive(Error, Debug)]
pub enum VocabError {
    /// The file could not be opened, read or written
    #[error("Error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV content is malformed
    #[error("Error parsing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row is missing its required word
    #[error("Row {row} in {path}: Word is required")]
    MissingWord { path: PathBuf, row: usize },
}

/// Failures of a single external call.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Chat completion failed
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Image generation request failed
    #[error("Image generation error: {message}")]
    Image {
        message: String,
        status_code: Option<u16>,
    },

    /// Fetching a generated image failed
    #[error("Image download failed from {url}: {message}")]
    Download { url: String, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// Saving a generated image failed
    #[error("Failed to save image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Ankify results.
pub type Result<T> = std::result::Result<T, AnkifyError>;

/// Convenience type alias for single-call results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
