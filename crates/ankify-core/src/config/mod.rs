//! Configuration management for Ankify.
//!
//! Settings are layered: built-in defaults, then an optional TOML file in the
//! platform config directory, then environment variables. Presence checks
//! for required values happen per command, not at load time.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::llm::resolve_env_var;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Ankify.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input, output and image locations
    pub paths: PathsConfig,

    /// Source and target language names
    pub languages: LanguagesConfig,

    /// Model provider settings
    pub llm: LlmConfig,

    /// Pipeline behavior
    pub pipeline: PipelineConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default file location, then apply
    /// environment overrides.
    ///
    /// A missing config file is not an error; defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment-style variables.
    ///
    /// Takes a lookup function so callers (and tests) decide where values
    /// come from. Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("INPUT_CSV_PATH") {
            self.paths.input_csv = Some(PathBuf::from(v));
        }
        if let Some(v) = get("OUTPUT_CSV_PATH") {
            self.paths.output_csv = Some(PathBuf::from(v));
        }
        if let Some(v) = get("IMAGES_DIR") {
            self.paths.images_dir = PathBuf::from(v);
        }
        if let Some(v) = get("SOURCE_LANGUAGE") {
            self.languages.source = v;
        }
        if let Some(v) = get("TARGET_LANGUAGE") {
            self.languages.target = v;
        }
        if let Some(v) = get("ANKIFY_CHAT_MODEL") {
            self.llm.chat_model = v;
        }
        if let Some(v) = get("ANKIFY_IMAGE_MODEL") {
            self.llm.image_model = v;
        }
        if let Some(v) = get("ANKIFY_IMAGE_STYLE") {
            self.llm.image_style = v;
        }
        if let Some(v) = get("ANKIFY_ERROR_MODE") {
            self.pipeline.error_mode = v
                .parse()
                .map_err(|e: String| ConfigError::ValidationError(e))?;
        }
        Ok(())
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.ankify.ankify/config.toml
    /// - Linux: ~/.config/ankify/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\ankify\config\config.toml
    ///
    /// Falls back to ~/.ankify/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "ankify", "ankify")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".ankify").join("config.toml")
            })
    }

    /// Resolve the API key, failing if it is unset.
    pub fn require_api_key(&self) -> Result<String, ConfigError> {
        resolve_env_var(&self.llm.api_key).ok_or(ConfigError::Missing {
            name: "OPENAI_API_KEY",
        })
    }

    /// Resolved input CSV path, failing if it is unset.
    pub fn require_input(&self) -> Result<PathBuf, ConfigError> {
        self.paths
            .input_csv
            .as_deref()
            .map(expand)
            .ok_or(ConfigError::Missing {
                name: "INPUT_CSV_PATH",
            })
    }

    /// Resolved output CSV path, failing if it is unset.
    pub fn require_output(&self) -> Result<PathBuf, ConfigError> {
        self.paths
            .output_csv
            .as_deref()
            .map(expand)
            .ok_or(ConfigError::Missing {
                name: "OUTPUT_CSV_PATH",
            })
    }

    /// Get the resolved images directory (with ~ expansion).
    pub fn images_dir(&self) -> PathBuf {
        expand(&self.paths.images_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
