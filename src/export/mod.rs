//! CSV export of filtered papers.
//!
//! The column layout is fixed:
//!
//! | PubmedID | Title | Publication Date | Non-academic Author(s) | Company Affiliation(s) | Corresponding Author Email |
//!
//! A header row is always written, even when there are no papers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::models::FilteredPaper;

/// Header labels, in column order
pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Errors that can occur while exporting or reading back CSV
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write papers as CSV to any writer
pub fn write_csv<W: Write>(papers: &[FilteredPaper], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for paper in papers {
        wtr.serialize(paper)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Serialize papers to a CSV string
pub fn to_csv_string(papers: &[FilteredPaper]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(papers, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Export papers to `path`, or return the CSV text when no path is given
pub fn export_to_csv(
    papers: &[FilteredPaper],
    path: Option<&Path>,
) -> Result<Option<String>, ExportError> {
    tracing::debug!("Exporting {} records to CSV", papers.len());

    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_csv(papers, file)?;
            tracing::debug!("Data exported to {}", path.display());
            Ok(None)
        }
        None => to_csv_string(papers).map(Some),
    }
}

/// Parse CSV text produced by [`write_csv`] back into papers
pub fn read_csv(text: &str) -> Result<Vec<FilteredPaper>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let mut papers = Vec::new();
    for record in rdr.deserialize() {
        let paper: FilteredPaper = record?;
        papers.push(paper);
    }

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<FilteredPaper> {
        vec![
            FilteredPaper {
                id: "12345678".to_string(),
                title: "Kinase inhibitors, revisited".to_string(),
                publication_date: "2023-Jan-05".to_string(),
                non_academic_authors: "John Doe; Ann Lee".to_string(),
                company_affiliations: "Pharma Inc.".to_string(),
                corresponding_email: Some("jane@university.edu".to_string()),
            },
            FilteredPaper {
                id: "87654321".to_string(),
                title: "A \"quoted\" title".to_string(),
                publication_date: String::new(),
                non_academic_authors: "Bo Li".to_string(),
                company_affiliations: String::new(),
                corresponding_email: None,
            },
        ]
    }

    #[test]
    fn test_header_row() {
        let text = to_csv_string(&sample()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email"
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let text = to_csv_string(&[]).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("PubmedID,"));
    }

    #[test]
    fn test_quoting_and_missing_email() {
        let text = to_csv_string(&sample()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Kinase inhibitors, revisited\""));
        assert!(lines[2].contains("\"A \"\"quoted\"\" title\""));
        assert!(lines[2].ends_with("Bo Li,,"));
    }

    #[test]
    fn test_round_trip() {
        let papers = sample();
        let text = to_csv_string(&papers).unwrap();
        let parsed = read_csv(&text).unwrap();
        assert_eq!(parsed, papers);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let result = export_to_csv(&sample(), Some(path.as_path())).unwrap();
        assert!(result.is_none());

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&sample()).unwrap());
    }

    #[test]
    fn test_export_to_string() {
        let result = export_to_csv(&sample(), None).unwrap();
        assert!(result.unwrap().contains("12345678"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("results.csv");
        assert!(matches!(
            export_to_csv(&sample(), Some(path.as_path())),
            Err(ExportError::Io(_))
        ));
    }
}
