//! Text and URL Normalization Module
//!
//! Small helpers shared by every board parser:
//! - Collapse whitespace in scraped text
//! - Resolve relative hrefs against a board's origin
//! - Strip label prefixes such as "Posted "

use scraper::{ElementRef, Selector};
use url::Url;

/// Trim and collapse runs of whitespace into a single space
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve `href` against `origin`.
///
/// Hrefs already starting with `http` are returned unchanged; an empty href stays empty.
/// Root-relative paths are appended to the origin verbatim. Protocol-relative hrefs
/// (`//host/...`) would leave the board, so they resolve to nothing.
pub fn absolutize(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with("http") {
        return href.to_string();
    }
    if href.starts_with("//") {
        return String::new();
    }
    if href.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), href);
    }

    match Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", origin.trim_end_matches('/'), href),
    }
}

/// Remove a leading label such as "Posted " from scraped text
pub fn strip_label(text: &str, label: &str) -> String {
    clean_text(&text.replacen(label, "", 1))
}

/// Cleaned text of the element
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Cleaned text of the first descendant matching `css`, if any
pub fn select_text(element: &ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next().map(|e| element_text(&e))
}

/// Like [`select_text`] but treats an empty match as missing
pub fn select_non_empty(element: &ElementRef, css: &str) -> Option<String> {
    select_text(element, css).filter(|t| !t.is_empty())
}

/// `href` of the first descendant matching `css`, if any
pub fn select_href(element: &ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    element
        .select(&selector)
        .find_map(|e| e.value().attr("href"))
        .map(|h| h.trim().to_string())
}

/// Every element in `document` matching `css`; an invalid selector yields nothing
pub fn select_all<'a>(document: &'a scraper::Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => vec![],
    }
}
