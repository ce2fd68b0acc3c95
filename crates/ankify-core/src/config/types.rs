//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Input, output and image locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Vocabulary CSV to read
    pub input_csv: Option<PathBuf>,

    /// Enriched card CSV to write
    pub output_csv: Option<PathBuf>,

    /// Root directory for generated images
    pub images_dir: PathBuf,

    /// Store images under a `YYYY-MM-DD` subdirectory of `images_dir`
    pub date_partition: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_csv: None,
            output_csv: None,
            images_dir: PathBuf::from("./output/images"),
            date_partition: true,
        }
    }
}

/// Language pair used in every prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Language the vocabulary is written in
    pub source: String,

    /// Language translations are produced in
    pub target: String,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            source: "German".to_string(),
            target: "Russian".to_string(),
        }
    }
}

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,

    /// Chat model used for text fields
    pub chat_model: String,

    /// Sampling temperature for chat calls
    pub temperature: f32,

    /// Maximum tokens per chat completion
    pub max_tokens: u32,

    /// Image generation model
    pub image_model: String,

    /// Image size, e.g. "1024x1024"
    pub image_size: String,

    /// Image quality, e.g. "standard" or "hd"
    pub image_quality: String,

    /// Extra guidance appended to image prompts, e.g. how people in the
    /// picture should look. Empty for none.
    pub image_style: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retries for transient failures (0 disables retrying)
    pub retry_attempts: u32,

    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.3,
            max_tokens: 500,
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
            image_style: String::new(),
            timeout_ms: 60_000,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

/// What happens when a single model or image call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Substitute the field's fallback value and keep going
    #[default]
    Lenient,
    /// Abort the whole run on the first failure
    Strict,
}

impl FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown error mode '{other}' (expected 'lenient' or 'strict')"
            )),
        }
    }
}

/// Pipeline behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Failure handling for individual calls
    pub error_mode: ErrorMode,

    /// Generate an image for every row
    pub generate_images: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            generate_images: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
