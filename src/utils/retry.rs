//! Retry utilities with exponential backoff for resilient API calls.

use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend on retries (including delays)
    pub max_total_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            max_total_time: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.initial_delay;
        }
        let exp_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt as f64 - 1.0);
        Duration::from_secs_f64(exp_delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Rate limit exceeded (with optional retry-after seconds)
    RateLimit(Option<u64>),
    /// Server error (5xx)
    ServerError,
    /// Service unavailable (503)
    ServiceUnavailable,
    /// Request or gateway timeout
    Timeout,
}

impl TransientError {
    /// Classify an HTTP status code
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Some(TransientError::RateLimit(None));
        }

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Some(TransientError::ServiceUnavailable);
        }

        if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
            return Some(TransientError::Timeout);
        }

        if status.is_server_error() {
            return Some(TransientError::ServerError);
        }

        None
    }

    /// Check if a SourceError represents a transient error
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::RateLimit(retry_after) => Some(TransientError::RateLimit(*retry_after)),
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::Http(status) => Self::from_status(*status),
            _ => None,
        }
    }

    /// Get the recommended delay for this error
    ///
    /// NCBI allows 3 requests per second without an API key, so rate-limit
    /// backoff is short.
    pub fn recommended_delay(&self) -> Duration {
        match self {
            TransientError::RateLimit(Some(seconds)) => {
                Duration::from_secs(seconds.saturating_add(1))
            }
            TransientError::RateLimit(None) => Duration::from_secs(2),
            TransientError::ServiceUnavailable => Duration::from_secs(5),
            TransientError::Timeout => Duration::from_secs(2),
            TransientError::Network => Duration::from_secs(1),
            TransientError::ServerError => Duration::from_secs(1),
        }
    }
}

/// Execute an async operation with retry logic
///
/// Transient errors (see [`TransientError`]) are retried with exponential
/// backoff; any other error is returned immediately.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut total_elapsed = Duration::ZERO;
    let mut operation = operation;

    loop {
        attempts += 1;

        match timeout(config.max_total_time, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => {
                let Some(transient) = TransientError::from_source_error(&error) else {
                    return Err(error);
                };

                let delay = std::cmp::max(
                    config.backoff_delay(attempts),
                    transient.recommended_delay(),
                );
                total_elapsed += delay;

                if attempts >= config.max_attempts || total_elapsed >= config.max_total_time {
                    tracing::warn!(
                        "Operation failed after {} attempts (total elapsed: {:?}): {}",
                        attempts,
                        total_elapsed,
                        error
                    );
                    return Err(error);
                }

                tracing::debug!(
                    "Transient error on attempt {}: {:?}, retrying in {:?}",
                    attempts,
                    transient,
                    delay
                );
                sleep(delay).await;
            }
            Err(_) => {
                let error = SourceError::Network("Operation timed out".to_string());
                if attempts >= config.max_attempts {
                    return Err(error);
                }

                total_elapsed += config.initial_delay;
                tracing::debug!(
                    "Operation timed out, attempt {}/{}",
                    attempts,
                    config.max_attempts
                );
                sleep(config.initial_delay).await;
            }
        }
    }
}

/// Retry configuration used for NCBI E-utilities requests
pub fn api_retry_config() -> RetryConfig {
    RetryConfig::default()
}
