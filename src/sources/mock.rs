//! Mock source for testing purposes.

use async_trait::async_trait;

use crate::models::{Paper, SearchQuery};
use crate::sources::{Source, SourceError};

/// A source that serves a fixed set of papers.
///
/// `search` returns the ids of the stored papers (up to `max_results`), in
/// order; `fetch_details` returns the stored papers for the requested ids.
#[derive(Debug, Default, Clone)]
pub struct MockSource {
    papers: Vec<Paper>,
}

impl MockSource {
    /// Create a mock source over the given papers
    pub fn new(papers: Vec<Paper>) -> Self {
        Self { papers }
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        Ok(self
            .papers
            .iter()
            .take(query.max_results)
            .map(|p| p.id.clone())
            .collect())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.papers.iter().find(|p| &p.id == id))
            .cloned()
            .collect())
    }
}
