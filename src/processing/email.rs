//! Email address extraction from free-text affiliations.

/// Characters that end an email candidate on either side of the "@"
const EMAIL_BOUNDARIES: &[u8] = b" ,;()";

/// Extract the email address around the first "@" in an affiliation
///
/// The candidate is widened left and right from the "@" until a space, comma,
/// semicolon or parenthesis (or either end of the string). No validation is
/// done on the result, so trailing punctuation such as a full stop is kept.
pub fn extract_email(affiliation: &str) -> Option<&str> {
    let bytes = affiliation.as_bytes();
    let at = affiliation.find('@')?;

    let mut start = at;
    while start > 0 && !EMAIL_BOUNDARIES.contains(&bytes[start - 1]) {
        start -= 1;
    }

    let mut end = at;
    while end + 1 < bytes.len() && !EMAIL_BOUNDARIES.contains(&bytes[end + 1]) {
        end += 1;
    }

    Some(&affiliation[start..=end])
}

/// Email from the first affiliation that contains an "@"
pub fn first_email(affiliations: &[String]) -> Option<String> {
    affiliations
        .iter()
        .find(|a| a.contains('@'))
        .and_then(|a| extract_email(a))
        .map(str::to_string)
}
