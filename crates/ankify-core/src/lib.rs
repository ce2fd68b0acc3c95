//! Ankify Core - vocabulary enrichment library.
//!
//! Ankify turns a vocabulary list into flashcard-ready records: missing
//! translations and example sentences are filled in by a language model,
//! each word gets grammatical annotations and a generated picture, and the
//! result is written as a CSV ready for import.
//!
//! # Architecture
//!
//! ```text
//! CSV → VocabEntry → sentence/translation fill → image → annotations → CardRecord → CSV
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ankify_core::{Config, OpenAiProvider, Pipeline, Services};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ankify_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = Arc::new(OpenAiProvider::new(&config.require_api_key()?, &config.llm));
//!     let services = Services::from_config(&config, provider.clone(), provider);
//!     let output = config.require_output()?;
//!     let pipeline = Pipeline::new(services, config.pipeline.error_mode, &output);
//!
//!     let entries = ankify_core::vocab::read_entries(&config.require_input()?)?;
//!     let (cards, _report) = pipeline.run(&entries, |_, _| {}).await?;
//!     ankify_core::vocab::write_cards(&output, &cards)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod paths;
pub mod pipeline;
pub mod regenerate;
pub mod services;
pub mod types;
pub mod vocab;

pub use config::{Config, ErrorMode};
pub use error::{AnkifyError, ConfigError, Result, ServiceError, VocabError};
pub use llm::{ChatProvider, ImageProvider, OpenAiProvider};
pub use pipeline::{Pipeline, ProcessedRow, Services};
pub use regenerate::Regenerator;
pub use types::{CardRecord, RunReport, VocabEntry};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
