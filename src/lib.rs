//! # Pharma Papers
//!
//! Find PubMed papers with at least one author affiliated with a
//! pharmaceutical or biotech company, and export them as CSV.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, Author, FilteredPaper, SearchQuery)
//! - [`processing`]: Affiliation classification and paper filtering
//! - [`sources`]: Record fetchers (PubMed E-utilities, mock)
//! - [`export`]: CSV export
//! - [`utils`]: HTTP client and retry utilities
//! - [`config`]: Configuration management

pub mod config;
pub mod export;
pub mod models;
pub mod processing;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use export::export_to_csv;
pub use models::{Author, FilteredPaper, Paper};
pub use processing::filter_papers;
pub use sources::{PubMedSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
