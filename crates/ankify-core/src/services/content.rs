//! Example sentence generation.

use crate::error::ServiceError;
use crate::llm::{prompts, Completer};

/// Writes a simple example sentence for a word.
#[derive(Clone)]
pub struct ContentGenerator {
    completer: Completer,
    language: String,
}

impl ContentGenerator {
    pub fn new(completer: Completer, language: &str) -> Self {
        Self {
            completer,
            language: language.to_string(),
        }
    }

    /// Generate one sentence in the source language using `word`.
    ///
    /// Fallback: empty string.
    pub async fn generate_example_sentence(&self, word: &str) -> Result<String, ServiceError> {
        self.completer
            .complete(
                "example sentence",
                prompts::example_sentence(word, &self.language),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::services::testing::MockChat;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_generates_trimmed_sentence() {
        let mock = Arc::new(MockChat::echo("Der Hund bellt laut."));
        let completer = Completer::new(mock.clone(), &LlmConfig::default());
        let generator = ContentGenerator::new(completer, "German");

        let sentence = generator.generate_example_sentence("hund").await.unwrap();
        assert_eq!(sentence, "Der Hund bellt laut.");

        let requests = mock.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system.contains("example sentences in German"));
        assert_eq!(requests[0].user, "Word: hund");
    }

    #[tokio::test]
    async fn test_failure_is_returned() {
        let completer = Completer::new(Arc::new(MockChat::failing()), &LlmConfig::default());
        let generator = ContentGenerator::new(completer, "German");
        assert!(generator.generate_example_sentence("hund").await.is_err());
    }
}
