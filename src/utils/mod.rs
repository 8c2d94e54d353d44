//! Utility modules supporting PubMed requests.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a crate user agent
//! - [`RetryConfig`]: configuration for retry logic with exponential backoff
//! - [`with_retry`]: execute an operation with automatic retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use pharma_papers::utils::{with_retry, RetryConfig};
//! use pharma_papers::sources::SourceError;
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default().max_attempts(3);
//! let result = with_retry(config, || async { fetch_data().await }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
