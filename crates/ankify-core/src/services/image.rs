//! Image generation and download.
//!
//! Images land in `<images_dir>/<YYYY-MM-DD>/<unix_millis>_<word>.png`, the
//! date being fixed when the generator is built so one run never spans two
//! directories.

use crate::config::Config;
use crate::error::ServiceError;
use crate::llm::{prompts, with_retry, GeneratedImage, ImageProvider, ImageRequest, RetryPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Settings for [`ImageGenerator`].
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Directory images are written to (already date-partitioned if enabled)
    pub dir: PathBuf,
    pub size: String,
    pub quality: String,
    /// Source language named in the prompt
    pub language: String,
    /// Appended to prompts; empty for none
    pub style: String,
    pub policy: RetryPolicy,
}

impl ImageOptions {
    pub fn from_config(config: &Config) -> Self {
        let mut dir = config.images_dir();
        if config.paths.date_partition {
            dir.push(chrono::Local::now().format("%Y-%m-%d").to_string());
        }
        Self {
            dir,
            size: config.llm.image_size.clone(),
            quality: config.llm.image_quality.clone(),
            language: config.languages.source.clone(),
            style: config.llm.image_style.clone(),
            policy: RetryPolicy::from(&config.llm),
        }
    }
}

/// Generates one picture per word and stores it on disk.
#[derive(Clone)]
pub struct ImageGenerator {
    provider: Arc<dyn ImageProvider>,
    client: reqwest::Client,
    options: ImageOptions,
}

impl ImageGenerator {
    /// The call deadline is never shorter than the provider's own request
    /// timeout, which for image backends is longer than the chat one.
    pub fn new(provider: Arc<dyn ImageProvider>, mut options: ImageOptions) -> Self {
        let provider_ms = u64::try_from(provider.timeout().as_millis()).unwrap_or(u64::MAX);
        options.policy.timeout_ms = options.policy.timeout_ms.max(provider_ms);
        Self {
            provider,
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Extra style guidance appended to every image prompt.
    pub fn style(&self) -> &str {
        &self.options.style
    }

    /// Generate an image for `word`, using `context` (usually the example
    /// sentence) to steer the picture. Returns the saved file's path.
    ///
    /// Fallback: no image (empty path in the CSV).
    pub async fn generate(&self, word: &str, context: &str) -> Result<PathBuf, ServiceError> {
        let prompt = prompts::image(word, context, &self.options.language, &self.options.style);
        self.generate_with_prompt(word, &prompt).await
    }

    /// Generate an image from a fully built prompt.
    pub async fn generate_with_prompt(
        &self,
        word: &str,
        prompt: &str,
    ) -> Result<PathBuf, ServiceError> {
        let request = ImageRequest {
            prompt: prompt.to_string(),
            size: self.options.size.clone(),
            quality: self.options.quality.clone(),
        };

        let image = with_retry(&self.options.policy, "image generation", || {
            self.provider.generate_image(&request)
        })
        .await?;

        tokio::fs::create_dir_all(&self.options.dir)
            .await
            .map_err(|source| ServiceError::Io {
                path: self.options.dir.clone(),
                source,
            })?;

        let path = self.options.dir.join(file_name(word));
        match image {
            GeneratedImage::Bytes(bytes) => {
                tokio::fs::write(&path, bytes)
                    .await
                    .map_err(|source| ServiceError::Io {
                        path: path.clone(),
                        source,
                    })?;
            }
            GeneratedImage::Url(url) => download(&self.client, &url, &path).await?,
        }

        tracing::debug!(
            provider = self.provider.name(),
            "Saved image for {word:?} to {path:?}"
        );
        Ok(path)
    }
}

/// `<unix_millis>_<word>.png` with every non-ASCII-alphanumeric replaced by `_`.
fn file_name(word: &str) -> String {
    let stem: String = word
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.png", chrono::Utc::now().timestamp_millis(), stem)
}

/// Download a file from a URL to a local path, streaming to disk.
async fn download(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), ServiceError> {
    use futures_util::StreamExt;

    let download_err = |message: String| ServiceError::Download {
        url: url.to_string(),
        message,
    };
    let io_err = |source| ServiceError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| download_err(e.to_string()))?;

    let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
        file.write_all(&chunk).await.map_err(io_err)?;
    }

    file.flush().await.map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockImage;
    use std::time::Duration;

    fn options(dir: &Path) -> ImageOptions {
        ImageOptions {
            dir: dir.to_path_buf(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            language: "German".to_string(),
            style: String::new(),
            policy: RetryPolicy::default(),
        }
    }

    /// Answers after `delay`, advertising a request timeout of `timeout`.
    struct SlowImage {
        delay: Duration,
        timeout: Duration,
    }

    #[async_trait::async_trait]
    impl ImageProvider for SlowImage {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate_image(
            &self,
            _request: &ImageRequest,
        ) -> Result<GeneratedImage, ServiceError> {
            tokio::time::sleep(self.delay).await;
            Ok(GeneratedImage::Bytes(vec![1]))
        }

        fn timeout(&self) -> Duration {
            self.timeout
        }
    }

    #[test]
    fn test_file_name_sanitizes_word() {
        let name = file_name("der Bär");
        assert!(name.ends_with("_der_B_r.png"), "{name}");
        let millis = name.split('_').next().unwrap();
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn test_options_date_partition() {
        let mut config = Config::default();
        config.paths.images_dir = PathBuf::from("out/images");
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();

        let opts = ImageOptions::from_config(&config);
        assert_eq!(opts.dir, PathBuf::from("out/images").join(today));

        config.paths.date_partition = false;
        let opts = ImageOptions::from_config(&config);
        assert_eq!(opts.dir, PathBuf::from("out/images"));
    }

    #[tokio::test]
    async fn test_generate_writes_inline_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("images/2026-01-01");
        let mock = Arc::new(MockImage::ok());
        let generator = ImageGenerator::new(mock.clone(), options(&dir));

        let path = generator
            .generate("tisch", "Der Tisch ist rund.")
            .await
            .unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
        let prompts = mock.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"tisch\""));
        assert!(prompts[0].contains("Context: Der Tisch ist rund."));
    }

    #[tokio::test]
    async fn test_call_deadline_follows_provider_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.policy.timeout_ms = 100;
        let provider = Arc::new(SlowImage {
            delay: Duration::from_millis(150),
            timeout: Duration::from_millis(400),
        });
        let generator = ImageGenerator::new(provider, opts);

        let path = generator.generate("tisch", "").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_call_deadline_still_applies() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.policy.timeout_ms = 50;
        let provider = Arc::new(SlowImage {
            delay: Duration::from_millis(500),
            timeout: Duration::from_millis(100),
        });
        let generator = ImageGenerator::new(provider, opts);

        let err = generator.generate("tisch", "").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Timeout { timeout_ms: 100, .. }
        ));
    }

    #[tokio::test]
    async fn test_style_is_appended_to_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.style = "Watercolor look.".to_string();
        let mock = Arc::new(MockImage::ok());
        let generator = ImageGenerator::new(mock.clone(), opts);

        generator.generate("tisch", "").await.unwrap();
        assert_eq!(generator.style(), "Watercolor look.");
        assert!(mock.prompts.lock().unwrap()[0].ends_with("Watercolor look."));
    }

    #[tokio::test]
    async fn test_generate_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("images");
        let generator = ImageGenerator::new(Arc::new(MockImage::failing()), options(&dir));

        let result = generator.generate("tisch", "").await;
        assert!(matches!(result, Err(ServiceError::Image { .. })));
        assert!(!dir.exists());
    }
}
