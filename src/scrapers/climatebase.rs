use super::{JobBoard, Timings};
use crate::browser::{BrowserProfile, WaitStep};
use crate::normalize::{absolutize, element_text, select_all, select_href, select_text};
use crate::types::{JobListing, RawListing, Source};
use scraper::{ElementRef, Html, Selector};

const SEARCH_URL: &str = "https://climatebase.org/jobs?q=Software+Engineer&l=eyJ2YWx1ZSI6InJlbW90ZSIsImxhYmVsIjoiUmVtb3RlIn0%3D&remote_preferences=Remote%7Cremote&remote=true";
const ORIGIN: &str = "https://climatebase.org";

// Generated styled-components class names; these change whenever the site is rebuilt
const CARD_SELECTOR: &str = ".sc-160a4b41-1";
const TITLE_SELECTOR: &str = ".sc-160a4b41-2";
const DETAIL_SELECTOR: &str = ".sc-160a4b41-5";
const DATE_SELECTOR: &str = ".sc-160a4b41-6";

pub struct Climatebase;

impl JobBoard for Climatebase {
    fn source(&self) -> Source {
        Source::Climatebase
    }

    fn search_url(&self) -> &'static str {
        SEARCH_URL
    }

    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn profile(&self) -> BrowserProfile {
        BrowserProfile {
            viewport: Some((1280, 800)),
            ..BrowserProfile::default()
        }
    }

    fn readiness(&self, timings: &Timings) -> Vec<WaitStep> {
        vec![WaitStep::Selector {
            css: CARD_SELECTOR,
            timeout: timings.content_wait,
        }]
    }

    fn parse(&self, html: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);

        select_all(&document, CARD_SELECTOR)
            .iter()
            .filter_map(|card| {
                let details = detail_items(card);
                let href = job_link(card).unwrap_or_default();
                let url = absolutize(ORIGIN, &href);
                if url.is_empty() {
                    return None;
                }

                RawListing {
                    title: select_text(card, TITLE_SELECTOR).unwrap_or_default(),
                    company: details.first().cloned().unwrap_or_default(),
                    location: details.get(1).cloned(),
                    salary: None,
                    date_posted: select_text(card, DATE_SELECTOR).unwrap_or_default(),
                    url,
                }
                .finish(Source::Climatebase, "Remote")
            })
            .collect()
    }
}

/// Company then location, in document order
fn detail_items(card: &ElementRef) -> Vec<String> {
    match Selector::parse(DETAIL_SELECTOR) {
        Ok(sel) => card.select(&sel).map(|item| element_text(&item)).collect(),
        Err(_) => vec![],
    }
}

/// Cards are usually wrapped in their link; otherwise look inside
fn job_link(card: &ElementRef) -> Option<String> {
    let wrapping = card
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.trim().to_string());

    wrapping.or_else(|| select_href(card, "a"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const PAGE: &str = r#"
    <html><body>
      <a href="/job/5501/senior-software-engineer">
        <div class="sc-160a4b41-1">
          <div class="sc-160a4b41-2">Senior Software Engineer</div>
          <ul>
            <li class="sc-160a4b41-5">Watershed</li>
            <li class="sc-160a4b41-5">Remote (Global)</li>
          </ul>
          <div class="sc-160a4b41-6">6 days ago</div>
        </div>
      </a>
      <div class="sc-160a4b41-1">
        <div class="sc-160a4b41-2">Staff Engineer</div>
        <ul><li class="sc-160a4b41-5">Arcadia</li></ul>
        <a href="https://climatebase.org/job/5502">Apply</a>
        <div class="sc-160a4b41-6">Today</div>
      </div>
      <div class="sc-160a4b41-1">
        <div class="sc-160a4b41-2">No Link Engineer</div>
        <ul><li class="sc-160a4b41-5">Nowhere Co</li></ul>
      </div>
      <a href="/job/5504">
        <div class="sc-160a4b41-1">
          <div class="sc-160a4b41-2">Nameless Company Role</div>
        </div>
      </a>
    </body></html>
    "#;

    #[test]
    fn test_parse_wrapped_card() {
        let jobs = Climatebase.parse(PAGE);
        assert_eq!(jobs.len(), 2);

        let job = &jobs[0];
        assert_eq!(job.title, "Senior Software Engineer");
        assert_eq!(job.company, "Watershed");
        assert_eq!(job.location, "Remote (Global)");
        assert_eq!(job.salary, None);
        assert_eq!(job.date_posted, "6 days ago");
        assert_eq!(job.url, "https://climatebase.org/job/5501/senior-software-engineer");
    }

    #[test]
    fn test_inner_link_and_default_location() {
        let job = &Climatebase.parse(PAGE)[1];
        assert_eq!(job.company, "Arcadia");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.url, "https://climatebase.org/job/5502");
    }

    #[test]
    fn test_waits_for_cards() {
        let waits = Climatebase.readiness(&Timings::default());
        assert_eq!(
            waits,
            vec![WaitStep::Selector {
                css: ".sc-160a4b41-1",
                timeout: Duration::from_secs(10),
            }]
        );
        assert_eq!(Climatebase.profile().viewport, Some((1280, 800)));
    }
}
