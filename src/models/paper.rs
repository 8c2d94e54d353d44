//! Paper records as fetched from PubMed, and the filtered rows we export.

use serde::{Deserialize, Serialize};

/// Separator used when joining author names and company names into one field
pub const FIELD_SEPARATOR: &str = "; ";

/// An author on a paper, with the raw affiliation strings from the record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Given name (PubMed `ForeName`)
    #[serde(default)]
    pub given_name: Option<String>,

    /// Family name (PubMed `LastName`)
    #[serde(default)]
    pub family_name: Option<String>,

    /// Affiliation strings in record order
    #[serde(default)]
    pub affiliations: Vec<String>,

    /// Email found in one of the affiliations, if any
    #[serde(default)]
    pub email: Option<String>,
}

impl Author {
    /// Create an author with the given names and no affiliations
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: Some(given_name.into()),
            family_name: Some(family_name.into()),
            affiliations: Vec::new(),
            email: None,
        }
    }

    /// Add an affiliation
    pub fn affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    /// Set the email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A paper record as returned by a [`Source`](crate::sources::Source)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// PubMed identifier
    #[serde(default)]
    pub id: String,

    /// Article title
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date fragments joined with "-" (e.g. "2023-Jan-05", "2021")
    #[serde(default)]
    pub publication_date: Option<String>,

    /// Authors in byline order
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl Paper {
    /// Create a paper with only an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the publication date
    pub fn publication_date(mut self, date: impl Into<String>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    /// Append an author
    pub fn author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }
}

/// A paper with at least one industry author, flattened for export
///
/// Field order matches the exported column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredPaper {
    #[serde(rename = "PubmedID")]
    pub id: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Publication Date")]
    pub publication_date: String,

    /// Display names of qualifying authors, joined with [`FIELD_SEPARATOR`]
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,

    /// Company names, joined with [`FIELD_SEPARATOR`]
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,

    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: Option<String>,
}

impl FilteredPaper {
    /// Qualifying author names as a vector
    pub fn author_list(&self) -> Vec<&str> {
        split_field(&self.non_academic_authors)
    }

    /// Company names as a vector
    pub fn company_list(&self) -> Vec<&str> {
        split_field(&self.company_affiliations)
    }
}

fn split_field(field: &str) -> Vec<&str> {
    field
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}
