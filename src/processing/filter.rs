//! Paper filtering: keep papers with at least one company-affiliated author.

use std::collections::BTreeSet;

use crate::models::{Author, FilteredPaper, Paper, FIELD_SEPARATOR};

use super::classifier::{classify, extract_company_name};

/// Display name of an author: "{given} {family}", trimmed
pub fn display_name(author: &Author) -> String {
    format!(
        "{} {}",
        author.given_name.as_deref().unwrap_or(""),
        author.family_name.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

/// Filter a single paper
///
/// Returns `None` when no author has an industry, non-academic affiliation.
/// Company names are deduplicated and joined in alphabetical order.
pub fn filter_paper(paper: &Paper) -> Option<FilteredPaper> {
    let mut industry_authors = Vec::new();
    let mut companies = BTreeSet::new();

    for author in &paper.authors {
        let mut qualifies = false;

        for affiliation in &author.affiliations {
            if !classify(affiliation).is_non_academic_industry() {
                continue;
            }
            qualifies = true;

            let company = extract_company_name(affiliation);
            if !company.is_empty() {
                companies.insert(company);
            }
        }

        if qualifies {
            industry_authors.push(display_name(author));
        }
    }

    if industry_authors.is_empty() {
        return None;
    }

    let corresponding_email = paper
        .authors
        .iter()
        .filter_map(|a| a.email.as_deref())
        .find(|e| !e.is_empty())
        .map(str::to_string);

    Some(FilteredPaper {
        id: paper.id.clone(),
        title: paper.title.clone().unwrap_or_default(),
        publication_date: paper.publication_date.clone().unwrap_or_default(),
        non_academic_authors: industry_authors.join(FIELD_SEPARATOR),
        company_affiliations: companies
            .into_iter()
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR),
        corresponding_email,
    })
}

/// Filter papers down to those with industry authors, preserving input order
pub fn filter_papers(papers: &[Paper]) -> Vec<FilteredPaper> {
    let filtered: Vec<FilteredPaper> = papers.iter().filter_map(filter_paper).collect();

    tracing::debug!(
        "Filtered {} papers to {} with pharma/biotech authors",
        papers.len(),
        filtered.len()
    );

    filtered
}
