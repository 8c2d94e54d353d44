//! Affiliation classification and paper filtering.
//!
//! - [`classify`]: academic vs. industry keyword test for one affiliation string
//! - [`extract_company_name`]: positional company-name guess from an affiliation
//! - [`extract_email`]: email candidate around the first "@" in an affiliation
//! - [`filter_papers`]: keep papers with at least one industry author
//!
//! ```rust
//! use pharma_papers::models::{Author, Paper};
//! use pharma_papers::processing::filter_papers;
//!
//! let papers = vec![Paper::new("1")
//!     .author(Author::new("John", "Doe").affiliation("Pharma Inc., New York, USA"))];
//!
//! let filtered = filter_papers(&papers);
//! assert_eq!(filtered[0].company_affiliations, "Pharma Inc.");
//! ```

mod classifier;
mod email;
mod filter;

pub use classifier::{
    classify, extract_company_name, is_industry_affiliation, Classification, ACADEMIC_KEYWORDS,
    COMPANY_INDICATORS, INDUSTRY_KEYWORDS,
};
pub use email::{extract_email, first_email};
pub use filter::{display_name, filter_paper, filter_papers};
