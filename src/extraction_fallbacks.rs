//! Extraction Fallbacks Module
//!
//! Regex extraction from a card's free text, for boards whose markup does not
//! expose location, salary or posting date under stable selectors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref REMOTE_LOCATION_RE: Regex =
        Regex::new(r"Remote[^\n]*?(?:United States|Anywhere|[A-Z][a-z]+(?:,\s*[A-Z][a-z]+)*)")
            .unwrap();
    static ref SALARY_RE: Regex = Regex::new(
        r"(?:USD|GBP|CAD)\s*[$€£]?[\d,]+(?:\s*-\s*[$€£]?[\d,]+)?(?:\s*/\s*(?:year|month|hour))?"
    )
    .unwrap();
    static ref POSTED_RE: Regex = Regex::new(r"Posted\s+(.+?)\s+ago").unwrap();
}

/// Location phrase starting with "Remote", e.g. "Remote, United States".
///
/// Text that mentions Remote without a recognisable place yields plain "Remote";
/// text that never mentions it yields `None`.
pub fn extract_remote_location(text: &str) -> Option<String> {
    if !text.contains("Remote") {
        return None;
    }
    let location = REMOTE_LOCATION_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| "Remote".to_string());
    Some(location)
}

/// Currency-prefixed salary figure or range, e.g. "USD $90,000 - $120,000 / year"
pub fn extract_salary(text: &str) -> Option<String> {
    SALARY_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// "Posted 3 days ago" becomes "3 days", kept as scraped
pub fn extract_posted(text: &str) -> Option<String> {
    let caps = POSTED_RE.captures(text)?;
    caps.get(1).map(|m| m.as_str().trim().to_string())
}
