//! Provider traits and request/response types.
//!
//! Services talk to models through these traits so the pipeline can be
//! driven by the OpenAI provider in production and by mocks in tests.

use crate::error::ServiceError;
use async_trait::async_trait;
use std::time::Duration;

/// A single chat completion request: one system message, one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Instructions for the model
    pub system: String,
    /// The user turn (word, sentence, ...)
    pub user: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// The response from a chat completion.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text, already trimmed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// An image generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    /// e.g. "1024x1024"
    pub size: String,
    /// e.g. "standard"
    pub quality: String,
}

/// Where the generated image can be obtained from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedImage {
    /// Hosted image that still has to be downloaded
    Url(String),
    /// Image bytes returned inline
    Bytes(Vec<u8>),
}

/// Chat-completion capable backend.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (services hold `Arc<dyn ChatProvider>`).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run one chat completion.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ServiceError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Image-generation capable backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Request one generated image.
    async fn generate_image(&self, request: &ImageRequest)
        -> Result<GeneratedImage, ServiceError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
