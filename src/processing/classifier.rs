//! Keyword heuristics for telling academic affiliations from company ones.
//!
//! Matching is a case-insensitive substring test with no word boundaries, so
//! short keywords such as `"inc"` or `"co."` will also hit inside unrelated
//! words ("Princeton", "Morocco."). Academic evidence always wins over
//! industry evidence for a single affiliation string.

/// Keywords that indicate an academic or clinical institution
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academia",
    "faculty",
    "department",
    "laboratory",
    "univ.",
    "inst.",
    "lab",
    "hospital",
    "medical center",
    "clinic",
    "foundation",
    "center for",
];

/// Keywords that indicate a pharmaceutical, biotech or other corporate employer
pub const INDUSTRY_KEYWORDS: &[&str] = &[
    "pharma",
    "biotech",
    "therapeutics",
    "biosciences",
    "inc",
    "corp",
    "llc",
    "ltd",
    "limited",
    "gmbh",
    "co.",
    "company",
    "laboratories",
    "research and development",
    "r&d",
    "biopharma",
    "life sciences",
];

/// Corporate suffixes searched for, in priority order, when extracting a company name
pub const COMPANY_INDICATORS: &[&str] = &["Inc.", "Corp.", "LLC", "Ltd.", "GmbH", "Co."];

/// Maximum number of words kept in front of a corporate suffix
const MAX_COMPANY_WORDS: usize = 4;

/// Outcome of classifying a single affiliation string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    /// Matched at least one academic keyword
    pub is_academic: bool,
    /// Matched at least one industry keyword
    pub is_industry: bool,
}

impl Classification {
    /// Whether the affiliation counts as a company affiliation
    pub fn is_non_academic_industry(&self) -> bool {
        self.is_industry && !self.is_academic
    }
}

/// Classify an affiliation string against both keyword sets
pub fn classify(affiliation: &str) -> Classification {
    let lower = affiliation.to_lowercase();

    Classification {
        is_academic: ACADEMIC_KEYWORDS.iter().any(|k| lower.contains(k)),
        is_industry: INDUSTRY_KEYWORDS.iter().any(|k| lower.contains(k)),
    }
}

/// Shorthand for `classify(affiliation).is_non_academic_industry()`
pub fn is_industry_affiliation(affiliation: &str) -> bool {
    classify(affiliation).is_non_academic_industry()
}

/// Best-guess company name from an affiliation string
///
/// Looks for the first corporate suffix in [`COMPANY_INDICATORS`] order and
/// returns up to four words before it plus the suffix. Without a suffix the
/// text before the first comma is used. Returns an empty string when nothing
/// can be extracted.
pub fn extract_company_name(affiliation: &str) -> String {
    let affiliation = affiliation.trim();

    for indicator in COMPANY_INDICATORS {
        let Some((before, _)) = affiliation.split_once(indicator) else {
            continue;
        };
        if before.is_empty() {
            continue;
        }

        let words: Vec<&str> = before.split_whitespace().collect();
        let start = words.len().saturating_sub(MAX_COMPANY_WORDS);
        let name = format!("{} {}", words[start..].join(" "), indicator);
        return name.trim().to_string();
    }

    match affiliation.split_once(',') {
        Some((first, _)) => first.trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_industry() {
        let c = classify("Pharma Inc., New York, USA");
        assert!(c.is_industry);
        assert!(!c.is_academic);
        assert!(c.is_non_academic_industry());
    }

    #[test]
    fn test_classify_academic() {
        let c = classify("University of Science, Boston, USA");
        assert!(c.is_academic);
        assert!(!c.is_non_academic_industry());
    }

    #[test]
    fn test_academic_overrides_industry() {
        let cases = [
            "Department of Pharmacology, Pfizer Inc., Groton, CT",
            "Biotech Research Laboratory, University of Tokyo",
            "Harvard Medical School and Novartis Pharma AG",
            "Therapeutics Clinic, Mayo Foundation",
        ];
        for affiliation in cases {
            let c = classify(affiliation);
            assert!(c.is_industry, "{affiliation}");
            assert!(c.is_academic, "{affiliation}");
            assert!(!is_industry_affiliation(affiliation), "{affiliation}");
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert!(is_industry_affiliation("GENENTECH INC, SOUTH SAN FRANCISCO"));
        assert!(!is_industry_affiliation("ROCHE PHARMA, UNIVERSITY HOSPITAL BASEL"));
    }

    #[test]
    fn test_substring_match_has_no_word_boundaries() {
        // "co." inside "Morocco." counts as an industry hit
        assert!(is_industry_affiliation("Agadir, Morocco."));
    }

    #[test]
    fn test_classify_neither() {
        let c = classify("Ministry of Health, Ottawa, Canada");
        assert_eq!(c, Classification::default());
        assert!(!c.is_non_academic_industry());
    }

    #[test]
    fn test_extract_company_name_with_indicators() {
        let name = extract_company_name("Pharma Inc., New York, USA");
        assert!(name.ends_with("Inc."));
        assert!(name.contains("Pharma"));
        assert_eq!(name, "Pharma Inc.");

        let name = extract_company_name("BioTech Corp., San Francisco, CA");
        assert!(name.ends_with("Corp."));
        assert!(name.contains("BioTech"));

        let name = extract_company_name("Molecular Systems Ltd., London, UK");
        assert!(name.ends_with("Ltd."));
        assert!(name.contains("Molecular Systems"));
    }

    #[test]
    fn test_extract_company_name_keeps_four_words() {
        assert_eq!(
            extract_company_name("Oncology Research, Big Green Drug Makers Inc., Boston"),
            "Big Green Drug Makers Inc."
        );
    }

    #[test]
    fn test_extract_company_name_indicator_order() {
        // "Inc." is tried before "GmbH" regardless of position
        assert_eq!(
            extract_company_name("Acme GmbH, a subsidiary of Acme Holdings Inc."),
            "subsidiary of Acme Holdings Inc."
        );
    }

    #[test]
    fn test_extract_company_name_skips_leading_indicator() {
        // Nothing precedes "Inc." so the next indicator is tried
        assert_eq!(extract_company_name("Inc. Partners LLC, Austin"), "Inc. Partners LLC");
    }

    #[test]
    fn test_extract_company_name_fallback_to_comma() {
        assert_eq!(
            extract_company_name("  Novartis Pharma AG, Basel, Switzerland"),
            "Novartis Pharma AG"
        );
    }

    #[test]
    fn test_extract_company_name_empty() {
        assert_eq!(extract_company_name("Genentech"), "");
        assert_eq!(extract_company_name(""), "");
        assert_eq!(extract_company_name(", Basel"), "");
    }
}
