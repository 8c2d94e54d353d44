//! PubMed record fetcher using the NCBI E-utilities API.
//!
//! Searching goes through `esearch` (JSON) to collect PMIDs, then `efetch`
//! (XML) returns the full records. The efetch payload is walked with the
//! quick-xml event reader so that titles containing inline markup such as
//! `<i>` or `<sup>` are read whole.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::PubMedConfig;
use crate::models::{Author, Paper, SearchQuery};
use crate::processing::first_email;
use crate::sources::{Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

/// Elements whose text content is collected while walking efetch XML
const CAPTURED_ELEMENTS: &[&str] = &[
    "PMID",
    "ArticleTitle",
    "Year",
    "Month",
    "Day",
    "MedlineDate",
    "LastName",
    "ForeName",
    "CollectiveName",
    "Affiliation",
];

/// PubMed research source
///
/// Uses NCBI E-utilities API for searching and fetching PubMed records.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
    email: Option<String>,
    tool: Option<String>,
    retry: RetryConfig,
}

impl PubMedSource {
    /// Create a PubMed source with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&PubMedConfig::default())
    }

    /// Create a PubMed source from configuration
    pub fn from_config(config: &PubMedConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, config: &PubMedConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            email: config.email.clone(),
            tool: config.tool.clone(),
            retry: api_retry_config().max_attempts(config.max_attempts),
        }
    }

    /// Encode request parameters, adding the NCBI etiquette parameters
    fn encode_params(&self, mut params: Vec<(&str, String)>) -> String {
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }

        params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.query.clone()),
            ("retmax", query.max_results.to_string()),
            ("retmode", "json".to_string()),
        ];
        format!("{}/esearch.fcgi?{}", self.base_url, self.encode_params(params))
    }

    /// Build E-utilities fetch URL for specific PubMed IDs
    fn build_fetch_url(&self, ids: &[String]) -> String {
        let params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "xml".to_string()),
        ];
        format!("{}/efetch.fcgi?{}", self.base_url, self.encode_params(params))
    }

    /// Parse E-utilities search response JSON
    fn parse_search_response(json: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            #[serde(default)]
            esearchresult: ESearchResult,
        }

        #[derive(Debug, Default, Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
            #[serde(rename = "ERROR", default)]
            error: Option<String>,
        }

        let response: ESearchResponse = serde_json::from_str(json)?;
        if let Some(error) = response.esearchresult.error {
            tracing::warn!("PubMed search reported an error: {}", error);
        }

        Ok(response.esearchresult.idlist)
    }

    /// Parse E-utilities fetch response XML
    fn parse_fetch_response(xml: &str) -> Result<Vec<Paper>, SourceError> {
        let mut reader = Reader::from_str(xml);

        let mut papers = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut capture_depth: Option<usize> = None;

        let mut paper: Option<Paper> = None;
        let mut author: Option<Author> = None;
        let mut date = PubDateParts::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    match name.as_str() {
                        "PubmedArticle" => {
                            paper = Some(Paper::default());
                            date = PubDateParts::default();
                        }
                        "Author" if paper.is_some() && path_ends_with(&path, &["AuthorList"]) => {
                            author = Some(Author::default());
                        }
                        _ => {}
                    }

                    if capture_depth.is_none() && CAPTURED_ELEMENTS.contains(&name.as_str()) {
                        capture_depth = Some(path.len());
                        text.clear();
                    }
                    path.push(name);
                }
                Ok(Event::Text(e)) => {
                    if capture_depth.is_some() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::CData(e)) => {
                    if capture_depth.is_some() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(name) = path.pop() else {
                        continue;
                    };

                    if capture_depth == Some(path.len()) {
                        capture_depth = None;
                        if let Some(paper) = paper.as_mut() {
                            let value = text.trim().to_string();
                            store_field(&name, &path, value, paper, author.as_mut(), &mut date);
                        }
                    }

                    match name.as_str() {
                        "Author" => {
                            if let (Some(mut finished), Some(paper)) = (author.take(), paper.as_mut())
                            {
                                finished.email = first_email(&finished.affiliations);
                                paper.authors.push(finished);
                            }
                        }
                        "PubmedArticle" => {
                            if let Some(mut finished) = paper.take() {
                                finished.publication_date = std::mem::take(&mut date).joined();
                                papers.push(finished);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(SourceError::Parse(format!(
                        "Failed to parse PubMed fetch XML: {}",
                        e
                    )));
                }
            }
        }

        Ok(papers)
    }

    /// GET a URL with retry, returning the body text
    async fn get_text(&self, url: String, action: &'static str) -> Result<String, SourceError> {
        let client = Arc::clone(&self.client);

        with_retry(self.retry, || {
            let client = Arc::clone(&client);
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to {}: {}", action, e)))?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(response.headers());
                    tracing::debug!("PubMed API rate-limited, retry after {:?}s", retry_after);
                    return Err(SourceError::RateLimit(retry_after));
                }
                if !status.is_success() {
                    tracing::debug!("PubMed API returned status: {}", status);
                    return Err(SourceError::Http(status));
                }

                response
                    .text()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
            }
        })
        .await
    }
}

/// Journal issue publication date pieces
#[derive(Debug, Default)]
struct PubDateParts {
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    medline_date: Option<String>,
}

impl PubDateParts {
    /// "Year-Month-Day" from whichever parts exist, else the free-text MedlineDate
    fn joined(self) -> Option<String> {
        let parts: Vec<String> = [self.year, self.month, self.day]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            self.medline_date
        } else {
            Some(parts.join("-"))
        }
    }
}

/// Seconds from a `Retry-After` header given in delta-seconds form
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn path_ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

/// Store the text of a finished element, based on where it sits in the record
fn store_field(
    name: &str,
    parents: &[String],
    value: String,
    paper: &mut Paper,
    author: Option<&mut Author>,
    date: &mut PubDateParts,
) {
    if value.is_empty() {
        return;
    }

    match name {
        "PMID" if path_ends_with(parents, &["MedlineCitation"]) => {
            if paper.id.is_empty() {
                paper.id = value;
            }
        }
        "ArticleTitle" if path_ends_with(parents, &["Article"]) => {
            paper.title = Some(value);
        }
        "Year" | "Month" | "Day" | "MedlineDate"
            if path_ends_with(parents, &["JournalIssue", "PubDate"]) =>
        {
            let slot = match name {
                "Year" => &mut date.year,
                "Month" => &mut date.month,
                "Day" => &mut date.day,
                _ => &mut date.medline_date,
            };
            slot.get_or_insert(value);
        }
        "LastName" | "ForeName" | "CollectiveName" | "Affiliation" => {
            let Some(author) = author else {
                return;
            };
            match name {
                "LastName" if path_ends_with(parents, &["Author"]) => {
                    author.family_name = Some(value);
                }
                "ForeName" if path_ends_with(parents, &["Author"]) => {
                    author.given_name = Some(value);
                }
                "CollectiveName" if path_ends_with(parents, &["Author"]) => {
                    author.family_name.get_or_insert(value);
                }
                "Affiliation" => author.affiliations.push(value),
                _ => {}
            }
        }
        _ => {}
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        if query.query.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "Search query must not be empty".to_string(),
            ));
        }

        tracing::debug!("Searching PubMed with query: {}", query.query);
        let json = self
            .get_text(self.build_search_url(query), "search PubMed")
            .await?;

        let ids = Self::parse_search_response(&json)?;
        tracing::debug!("Found {} results", ids.len());

        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching details for {} papers", ids.len());
        let xml = self
            .get_text(self.build_fetch_url(ids), "fetch PubMed details")
            .await?;

        let papers = Self::parse_fetch_response(&xml)?;
        tracing::debug!("Parsed {} papers from XML", papers.len());

        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FETCH_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000001</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <Volume>12</Volume>
            <PubDate>
              <Year>2023</Year>
              <Month>Jan</Month>
              <Day>05</Day>
            </PubDate>
          </JournalIssue>
          <Title>Journal of Drug Discovery</Title>
        </Journal>
        <ArticleTitle>Role of <i>KRAS</i> inhibitors in R&amp;D pipelines.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>John</ForeName>
            <Initials>J</Initials>
            <AffiliationInfo>
              <Affiliation>Pharma Inc., New York, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>University of Science, Boston, USA.</Affiliation>
            </AffiliationInfo>
            <AffiliationInfo>
              <Affiliation>Electronic address: jane@university.edu.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>KRAS Study Group</CollectiveName>
          </Author>
        </AuthorList>
      </Article>
      <CommentsCorrectionsList>
        <CommentsCorrections RefType="Cites">
          <RefSource>Nature. 2020</RefSource>
          <PMID Version="1">31111111</PMID>
        </CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
    <PubmedData>
      <History>
        <PubMedPubDate PubStatus="pubmed">
          <Year>2023</Year>
          <Month>1</Month>
          <Day>6</Day>
        </PubMedPubDate>
      </History>
    </PubmedData>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation Status="PubMed-not-MEDLINE" Owner="NLM">
      <PMID Version="1">38000002</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Print">
            <PubDate>
              <MedlineDate>2022 Nov-Dec</MedlineDate>
            </PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Editorial.</ArticleTitle>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>
"#;

    fn test_config() -> PubMedConfig {
        PubMedConfig {
            api_key: None,
            email: None,
            ..PubMedConfig::default()
        }
    }

    fn source(config: &PubMedConfig) -> PubMedSource {
        PubMedSource::with_client(Arc::new(HttpClient::new().unwrap()), config)
    }

    #[test]
    fn test_build_search_url() {
        let source = source(&test_config());
        let query = SearchQuery::new("cancer immunotherapy").max_results(10);
        let url = source.build_search_url(&query);

        assert!(url.starts_with("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?"));
        assert!(url.contains("db=pubmed"));
        assert!(url.contains("term=cancer%20immunotherapy"));
        assert!(url.contains("retmax=10"));
        assert!(url.contains("retmode=json"));
        assert!(url.contains("tool=pharma-papers"));
        assert!(!url.contains("api_key="));
    }

    #[test]
    fn test_build_search_url_with_etiquette() {
        let config = PubMedConfig {
            base_url: "http://localhost:9000/eutils/".to_string(),
            api_key: Some("abc123".to_string()),
            email: Some("me@example.com".to_string()),
            ..test_config()
        };
        let url = source(&config).build_search_url(&SearchQuery::new("aspirin[ti]"));

        assert!(url.starts_with("http://localhost:9000/eutils/esearch.fcgi?"));
        assert!(url.contains("term=aspirin%5Bti%5D"));
        assert!(url.contains("api_key=abc123"));
        assert!(url.contains("email=me%40example.com"));
    }

    #[test]
    fn test_build_fetch_url() {
        let source = source(&test_config());
        let url = source.build_fetch_url(&["1".to_string(), "2".to_string()]);

        assert!(url.contains("/efetch.fcgi?"));
        assert!(url.contains("id=1%2C2"));
        assert!(url.contains("retmode=xml"));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "header": {"type": "esearch", "version": "0.3"},
            "esearchresult": {"count": "2", "retmax": "2", "retstart": "0",
                              "idlist": ["38000001", "38000002"]}
        }"#;
        let ids = PubMedSource::parse_search_response(json).unwrap();
        assert_eq!(ids, vec!["38000001", "38000002"]);
    }

    #[test]
    fn test_parse_search_response_missing_keys() {
        assert!(PubMedSource::parse_search_response("{}").unwrap().is_empty());
        assert!(PubMedSource::parse_search_response(
            r#"{"esearchresult": {"ERROR": "Invalid query"}}"#
        )
        .unwrap()
        .is_empty());
    }

    #[test]
    fn test_parse_search_response_invalid() {
        assert!(matches!(
            PubMedSource::parse_search_response("<html>"),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_fetch_response() {
        let papers = PubMedSource::parse_fetch_response(FETCH_XML).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.id, "38000001");
        assert_eq!(
            first.title.as_deref(),
            Some("Role of KRAS inhibitors in R&D pipelines.")
        );
        assert_eq!(first.publication_date.as_deref(), Some("2023-Jan-05"));
        assert_eq!(first.authors.len(), 3);

        let doe = &first.authors[0];
        assert_eq!(doe.given_name.as_deref(), Some("John"));
        assert_eq!(doe.family_name.as_deref(), Some("Doe"));
        assert_eq!(doe.affiliations, vec!["Pharma Inc., New York, USA."]);
        assert_eq!(doe.email, None);

        let smith = &first.authors[1];
        assert_eq!(smith.affiliations.len(), 2);
        assert_eq!(smith.email.as_deref(), Some("jane@university.edu."));

        let group = &first.authors[2];
        assert_eq!(group.given_name, None);
        assert_eq!(group.family_name.as_deref(), Some("KRAS Study Group"));
        assert!(group.affiliations.is_empty());
    }

    #[test]
    fn test_parse_fetch_response_medline_date_and_no_authors() {
        let papers = PubMedSource::parse_fetch_response(FETCH_XML).unwrap();
        let second = &papers[1];

        assert_eq!(second.id, "38000002");
        assert_eq!(second.title.as_deref(), Some("Editorial."));
        assert_eq!(second.publication_date.as_deref(), Some("2022 Nov-Dec"));
        assert!(second.authors.is_empty());
    }

    #[test]
    fn test_parse_fetch_response_empty_set() {
        let papers = PubMedSource::parse_fetch_response("<PubmedArticleSet></PubmedArticleSet>")
            .unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_parse_fetch_response_malformed() {
        let result = PubMedSource::parse_fetch_response(
            "<PubmedArticleSet><PubmedArticle></PubmedArticleSet>",
        );
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_details_empty_ids() {
        let source = source(&test_config());
        assert!(source.fetch_details(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let source = source(&test_config());
        let result = source.search(&SearchQuery::new("   ")).await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }

    #[test]
    fn test_path_ends_with() {
        let path = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert!(path_ends_with(&path, &["B", "C"]));
        assert!(path_ends_with(&path, &[]));
        assert!(!path_ends_with(&path, &["A", "C"]));
        assert!(!path_ends_with(&path[..1], &["A", "B"]));
    }

    #[test]
    fn test_retry_after_secs() {
        use reqwest::header::HeaderValue;

        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("5"));
        assert_eq!(retry_after_secs(&headers), Some(5));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after_secs(&headers), None);
    }
}
