//! Record fetchers for literature databases.
//!
//! This module defines the [`Source`] trait: a two-step search (query to ids)
//! and detail fetch (ids to [`Paper`] records). [`PubMedSource`] implements it
//! against NCBI E-utilities; [`MockSource`] serves canned papers for tests.

mod mock;
mod pubmed;

pub use mock::MockSource;
pub use pubmed::PubMedSource;

use crate::models::{Paper, SearchQuery};
use async_trait::async_trait;

/// A literature database that can be searched and fetched from.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "pubmed")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for record ids matching the query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError>;

    /// Fetch full records for the given ids
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError>;

    /// Search, then fetch details for every id found
    async fn search_and_fetch(&self, query: &SearchQuery) -> Result<Vec<Paper>, SourceError> {
        let ids = self.search(query).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_details(&ids).await
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (XML, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded, with the server's Retry-After seconds if given
    #[error("Rate limit exceeded")]
    RateLimit(Option<u64>),

    /// Non-success HTTP status from the source
    #[error("API returned status: {0}")]
    Http(reqwest::StatusCode),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
