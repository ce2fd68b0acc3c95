//! Per-field enrichment services.
//!
//! Each service wraps one or more fixed prompts. Services return errors
//! rather than swallowing them; [`FallbackPolicy`] decides whether a failure
//! becomes the field's fallback value or aborts the run.

pub mod content;
pub mod enhancement;
pub mod image;
pub mod translation;

pub use content::ContentGenerator;
pub use enhancement::{Enhancements, Enhancer};
pub use image::{ImageGenerator, ImageOptions};
pub use translation::Translator;

use crate::config::ErrorMode;
use crate::error::ServiceError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Applies the configured [`ErrorMode`] to individual field results.
#[derive(Debug, Default)]
pub struct FallbackPolicy {
    mode: ErrorMode,
    used: AtomicUsize,
}

impl FallbackPolicy {
    pub fn new(mode: ErrorMode) -> Self {
        Self {
            mode,
            used: AtomicUsize::new(0),
        }
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    /// Number of fallbacks substituted so far.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }

    /// Pass successes through; on failure either substitute `fallback`
    /// (lenient) or return the error (strict).
    pub fn resolve<T>(
        &self,
        field: &str,
        result: Result<T, ServiceError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, ServiceError> {
        match (result, self.mode) {
            (Ok(value), _) => Ok(value),
            (Err(e), ErrorMode::Strict) => Err(e),
            (Err(e), ErrorMode::Lenient) => {
                tracing::warn!("{field} failed, using fallback: {e}");
                self.used.fetch_add(1, Ordering::Relaxed);
                Ok(fallback())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> Result<String, ServiceError> {
        Err(ServiceError::Llm {
            message: "nope".to_string(),
            status_code: None,
        })
    }

    #[test]
    fn test_lenient_substitutes_fallback() {
        let policy = FallbackPolicy::new(ErrorMode::Lenient);
        let value = policy.resolve("translation", failure(), String::new).unwrap();
        assert_eq!(value, "");
        assert_eq!(policy.used(), 1);
    }

    #[test]
    fn test_strict_propagates() {
        let policy = FallbackPolicy::new(ErrorMode::Strict);
        assert!(policy.resolve("translation", failure(), String::new).is_err());
        assert_eq!(policy.used(), 0);
    }

    #[test]
    fn test_success_passes_through() {
        let policy = FallbackPolicy::new(ErrorMode::Lenient);
        let value = policy
            .resolve("pos", Ok("noun".to_string()), || "x".to_string())
            .unwrap();
        assert_eq!(value, "noun");
        assert_eq!(policy.used(), 0);
    }
}
