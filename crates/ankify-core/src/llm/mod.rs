//! Model provider integration.
//!
//! Provides provider traits for chat completion and image generation, the
//! OpenAI implementation of both, prompt templates, and a completion helper
//! that applies timeouts and retries uniformly.

pub(crate) mod completer;
pub(crate) mod openai;
pub mod prompts;
pub(crate) mod provider;
pub(crate) mod retry;

pub use completer::Completer;
pub use openai::OpenAiProvider;
pub use provider::{
    resolve_env_var, ChatProvider, ChatRequest, ChatResponse, GeneratedImage, ImageProvider,
    ImageRequest,
};
pub use retry::{with_retry, RetryPolicy};
