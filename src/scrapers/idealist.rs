use super::JobBoard;
use crate::browser::BrowserProfile;
use crate::extraction_fallbacks::{extract_posted, extract_remote_location, extract_salary};
use crate::normalize::{absolutize, clean_text, select_all, select_href, select_text};
use crate::types::{JobListing, RawListing, Source};
use scraper::{ElementRef, Html};

const SEARCH_URL: &str = "https://www.idealist.org/en/jobs?functions=TECHNOLOGY_IT&locationType=REMOTE";
const ORIGIN: &str = "https://www.idealist.org";

const JOB_LINK_SELECTOR: &str = r#"a[href*="/nonprofit-job/"], a[href*="/consultant-job/"]"#;

pub struct Idealist;

impl JobBoard for Idealist {
    fn source(&self) -> Source {
        Source::Idealist
    }

    fn search_url(&self) -> &'static str {
        SEARCH_URL
    }

    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn profile(&self) -> BrowserProfile {
        BrowserProfile::disguised()
    }

    fn parse(&self, html: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);

        select_all(&document, r#"[data-qa-id="search-result"]"#)
            .iter()
            .filter_map(|card| {
                // Location, salary and date have no stable hooks; read them from the card text
                let text = card_lines(card);
                let href = select_href(card, JOB_LINK_SELECTOR).unwrap_or_default();

                RawListing {
                    title: select_text(card, r#"span[data-qa-id="search-result-link"]"#)
                        .unwrap_or_default(),
                    company: select_text(card, "h4").unwrap_or_default(),
                    location: extract_remote_location(&text),
                    salary: extract_salary(&text),
                    date_posted: extract_posted(&text).unwrap_or_default(),
                    url: absolutize(ORIGIN, &href),
                }
                .finish(Source::Idealist, "Not specified")
            })
            .collect()
    }
}

/// Text nodes of the card, one per line
fn card_lines(card: &ElementRef) -> String {
    card.text()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
