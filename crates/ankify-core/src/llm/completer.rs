//! Chat completion helper shared by the text services.

use super::prompts::Prompt;
use super::provider::{ChatProvider, ChatRequest};
use super::retry::{with_retry, RetryPolicy};
use crate::config::LlmConfig;
use crate::error::ServiceError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Sends rendered prompts to a chat provider with the configured sampling,
/// timeout and retry settings.
///
/// Clones share one token counter.
#[derive(Clone)]
pub struct Completer {
    provider: Arc<dyn ChatProvider>,
    policy: RetryPolicy,
    max_tokens: u32,
    temperature: f32,
    tokens: Arc<AtomicU64>,
}

impl Completer {
    pub fn new(provider: Arc<dyn ChatProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            policy: RetryPolicy::from(config),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            tokens: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Tokens reported by the provider across all clones so far.
    pub fn tokens_used(&self) -> u64 {
        self.tokens.load(Ordering::Relaxed)
    }

    /// Run one prompt and return the trimmed response text.
    pub async fn complete(&self, stage: &str, prompt: Prompt) -> Result<String, ServiceError> {
        let request = ChatRequest {
            system: prompt.system,
            user: prompt.user,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = with_retry(&self.policy, stage, || self.provider.complete(&request)).await?;
        if let Some(tokens) = response.tokens_used {
            self.tokens.fetch_add(u64::from(tokens), Ordering::Relaxed);
        }
        tracing::debug!(
            stage,
            provider = self.provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = response.tokens_used.unwrap_or(0),
            "chat completion"
        );
        Ok(response.text.trim().to_string())
    }
}
