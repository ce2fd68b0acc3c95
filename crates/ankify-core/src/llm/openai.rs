//! OpenAI provider using the Chat Completions and Images APIs.
//!
//! Any OpenAI-compatible endpoint works; the base URL comes from config.

use super::provider::{
    ChatProvider, ChatRequest, ChatResponse, GeneratedImage, ImageProvider, ImageRequest,
};
use crate::config::LlmConfig;
use crate::error::ServiceError;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider for both chat and image generation.
pub struct OpenAiProvider {
    api_key: String,
    chat_model: String,
    image_model: String,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, config: &LlmConfig) -> Self {
        Self {
            api_key: api_key.to_string(),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            client: reqwest::Client::new(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// --- Chat request types ---

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// --- Chat response types ---

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

// --- Image request/response types ---

#[derive(Serialize)]
struct ImageBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
}

#[derive(Deserialize)]
struct ImageGeneration {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

fn chat_body<'a>(model: &'a str, request: &'a ChatRequest) -> ChatBody<'a> {
    ChatBody {
        model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.user,
            },
        ],
    }
}

/// Map a transport failure so timeouts and refused connections stay
/// recognizable to the retry policy.
fn send_error(
    e: reqwest::Error,
    stage: &str,
    timeout: Duration,
    wrap: fn(String) -> ServiceError,
) -> ServiceError {
    if e.is_timeout() {
        return ServiceError::Timeout {
            stage: stage.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };
    }
    if e.is_connect() {
        return wrap(format!("OpenAI {stage}: failed to connect: {e}"));
    }
    wrap(format!("OpenAI {stage} request failed: {e}"))
}

fn image_from_data(data: ImageData) -> Result<GeneratedImage, ServiceError> {
    if let Some(url) = data.url {
        return Ok(GeneratedImage::Url(url));
    }
    if let Some(b64) = data.b64_json {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| ServiceError::Image {
                message: format!("Invalid base64 image payload: {e}"),
                status_code: None,
            })?;
        return Ok(GeneratedImage::Bytes(bytes));
    }
    Err(ServiceError::Image {
        message: "OpenAI returned an image entry with neither url nor b64_json".to_string(),
        status_code: None,
    })
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ServiceError> {
        let start = Instant::now();
        let body = chat_body(&self.chat_model, request);

        let resp = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(ChatProvider::timeout(self))
            .send()
            .await
            .map_err(|e| {
                send_error(e, "chat completion", ChatProvider::timeout(self), |message| {
                    ServiceError::Llm {
                        message,
                        status_code: None,
                    }
                })
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Llm {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let completion: ChatCompletion = resp.json().await.map_err(|e| ServiceError::Llm {
            message: format!("Failed to parse OpenAI response: {e}"),
            status_code: None,
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ServiceError::Llm {
                message: "OpenAI returned empty choices array, no content generated".to_string(),
                status_code: None,
            })?;

        Ok(ChatResponse {
            text: text.trim().to_string(),
            model: completion.model,
            tokens_used: completion.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> Result<GeneratedImage, ServiceError> {
        let body = ImageBody {
            model: &self.image_model,
            prompt: &request.prompt,
            n: 1,
            size: &request.size,
            quality: &request.quality,
        };

        let resp = self
            .client
            .post(self.url("images/generations"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(ImageProvider::timeout(self))
            .send()
            .await
            .map_err(|e| {
                send_error(e, "image generation", ImageProvider::timeout(self), |message| {
                    ServiceError::Image {
                        message,
                        status_code: None,
                    }
                })
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Image {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let generation: ImageGeneration = resp.json().await.map_err(|e| ServiceError::Image {
            message: format!("Failed to parse OpenAI image response: {e}"),
            status_code: None,
        })?;

        let data = generation
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Image {
                message: "OpenAI returned no images".to_string(),
                status_code: None,
            })?;

        image_from_data(data)
    }

    fn timeout(&self) -> Duration {
        // Image generation is markedly slower than chat
        self.timeout * 2
    }
}
