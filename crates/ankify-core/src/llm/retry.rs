//! Retry utilities for transient model failures.
//!
//! Provides classification of retryable errors, exponential backoff, and a
//! timeout-plus-retry driver shared by the chat and image services.

use crate::config::LlmConfig;
use crate::error::ServiceError;
use std::future::Future;
use std::time::Duration;

/// Timeout and retry settings for one kind of call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries after the first attempt
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

impl From<&LlmConfig> for RetryPolicy {
    fn from(config: &LlmConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Determine whether a service error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx).
/// Non-retryable: auth failures, bad requests, local I/O.
pub fn is_retryable(error: &ServiceError) -> bool {
    match error {
        ServiceError::Timeout { .. } => true,
        ServiceError::Llm {
            status_code,
            message,
        }
        | ServiceError::Image {
            status_code,
            message,
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            // Non-HTTP failures (connection refused, DNS)
            message.contains("timed out") || message.contains("connect")
        }
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

/// Run `op` under the policy's timeout, retrying retryable failures.
///
/// Returns the last error once attempts are exhausted or a non-retryable
/// error occurs.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, stage: &str, mut op: F) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let mut attempt = 0u32;
    loop {
        if attempt > 0 {
            let delay = backoff_duration(attempt - 1, policy.retry_delay_ms);
            tracing::debug!(
                "Retry {attempt}/{} for {stage} after {delay:?}",
                policy.retry_attempts
            );
            tokio::time::sleep(delay).await;
        }

        let result = match tokio::time::timeout(Duration::from_millis(policy.timeout_ms), op()).await
        {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout {
                stage: stage.to_string(),
                timeout_ms: policy.timeout_ms,
            }),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.retry_attempts && is_retryable(&e) => {
                tracing::debug!("{stage} failed, will retry: {e}");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
