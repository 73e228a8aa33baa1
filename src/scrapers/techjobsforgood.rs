use super::JobBoard;
use crate::normalize::{absolutize, select_all, select_non_empty, select_text, strip_label};
use crate::types::{JobListing, RawListing, Source};
use scraper::Html;

const SEARCH_URL: &str = "https://techjobsforgood.com/jobs/?job_function=Software+Engineering&locations=remote&q=";
const ORIGIN: &str = "https://techjobsforgood.com";

/// Each listing is an anchor card linking back to its job page
const CARD_SELECTOR: &str = r#"a[href^="/jobs/"][href*="?ref=homepage"]"#;

pub struct TechJobsForGood;

impl JobBoard for TechJobsForGood {
    fn source(&self) -> Source {
        Source::TechJobsForGood
    }

    fn search_url(&self) -> &'static str {
        SEARCH_URL
    }

    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn parse(&self, html: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);

        select_all(&document, CARD_SELECTOR)
            .iter()
            .filter_map(|card| {
                let company = select_non_empty(card, ".company-name .company_name")
                    .or_else(|| select_text(card, ".company-name"))
                    .unwrap_or_default();
                let href = card.value().attr("href").unwrap_or_default();

                RawListing {
                    title: select_text(card, ".job-title").unwrap_or_default(),
                    company,
                    location: select_text(card, ".location"),
                    salary: select_text(card, ".salary"),
                    date_posted: select_text(card, ".date-posted")
                        .map(|d| strip_label(&d, "Posted "))
                        .unwrap_or_default(),
                    url: absolutize(ORIGIN, href),
                }
                .finish(Source::TechJobsForGood, "")
            })
            .collect()
    }

    /// The search endpoint does not reliably filter by remoteness
    fn retain(&self, job: &JobListing) -> bool {
        job.location.to_lowercase().contains("remote")
    }
}
