//! Core data models for papers, authors and search operations.

mod paper;
mod search;

pub use paper::{Author, FilteredPaper, Paper, FIELD_SEPARATOR};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};
