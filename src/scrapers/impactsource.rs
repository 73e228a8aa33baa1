use super::JobBoard;
use crate::normalize::{
    absolutize, clean_text, element_text, select_all, select_href, select_text, strip_label,
};
use crate::types::{JobListing, RawListing, Source};
use scraper::{ElementRef, Html, Selector};

const SEARCH_URL: &str = "https://www.impactsource.ai/jobs?jobTypes=Software+Engineer&remoteOnly=true";
const ORIGIN: &str = "https://www.impactsource.ai";

const SALARY_DISCLAIMER: &str = "Always confirm salary details from the job posting.";

pub struct ImpactSource;

impl JobBoard for ImpactSource {
    fn source(&self) -> Source {
        Source::ImpactSource
    }

    fn search_url(&self) -> &'static str {
        SEARCH_URL
    }

    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn parse(&self, html: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);

        select_all(&document, ".job-list-job")
            .iter()
            .filter_map(|card| {
                let href = select_href(card, ".job-list-job-title a").unwrap_or_default();

                RawListing {
                    title: select_text(card, ".job-list-job-title a").unwrap_or_default(),
                    company: select_text(card, ".job-list-job-company-link").unwrap_or_default(),
                    location: Some(location(card)),
                    salary: salary(card),
                    date_posted: select_text(card, ".job-list-badge-posted")
                        .map(|d| strip_label(&d, "Posted "))
                        .unwrap_or_default(),
                    url: absolutize(ORIGIN, &href),
                }
                .finish(Source::ImpactSource, "Not specified")
            })
            .collect()
    }
}

/// Remote badge wins over the locations badge
fn location(card: &ElementRef) -> String {
    if let Some(remote) = select_text(card, ".job-list-badge-remote") {
        return if remote.is_empty() { "Remote".to_string() } else { remote };
    }
    select_text(card, ".job-list-badge-locations")
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "Not specified".to_string())
}

/// The salary badge is the one carrying a tooltip
fn salary(card: &ElementRef) -> Option<String> {
    let badge_sel = Selector::parse(".job-list-badge").ok()?;
    let tooltip_sel = Selector::parse(".job-list-badge-tooltip").ok()?;

    let badge = card
        .select(&badge_sel)
        .find(|badge| badge.select(&tooltip_sel).next().is_some())?;

    let text = element_text(&badge)
        .replacen("Salary range ", "", 1)
        .replacen(SALARY_DISCLAIMER, "", 1);
    let text = clean_text(&text);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><body>
      <div class="job-list-job">
        <div class="job-list-job-title"><a href="/jobs/solar-grid-swe">Software Engineer, Grid</a></div>
        <a class="job-list-job-company-link" href="/c/sunrise">Sunrise Power</a>
        <span class="job-list-badge job-list-badge-remote">Remote (US)</span>
        <span class="job-list-badge">
          Salary range $120k - $150k
          <span class="job-list-badge-tooltip">Always confirm salary details from the job posting.</span>
        </span>
        <span class="job-list-badge job-list-badge-posted">Posted 2 weeks ago</span>
      </div>
      <div class="job-list-job">
        <div class="job-list-job-title"><a href="https://jobs.example.com/42">Backend Engineer</a></div>
        <a class="job-list-job-company-link">Carbon Ledger</a>
        <span class="job-list-badge job-list-badge-locations">London, UK</span>
        <span class="job-list-badge job-list-badge-posted">Posted today</span>
      </div>
      <div class="job-list-job">
        <div class="job-list-job-title"><a href="/jobs/x">ML Engineer</a></div>
        <a class="job-list-job-company-link">Tidal Data</a>
        <span class="job-list-badge job-list-badge-remote"></span>
        <span class="job-list-badge"><span class="job-list-badge-tooltip">Always confirm salary details from the job posting.</span></span>
      </div>
      <div class="job-list-job">
        <div class="job-list-job-title"><a href="/jobs/y"></a></div>
        <a class="job-list-job-company-link">No Title Inc</a>
      </div>
    </body></html>
    "#;

    #[test]
    fn test_parse_full_card() {
        let jobs = ImpactSource.parse(PAGE);
        assert_eq!(jobs.len(), 3);

        let job = &jobs[0];
        assert_eq!(job.title, "Software Engineer, Grid");
        assert_eq!(job.company, "Sunrise Power");
        assert_eq!(job.location, "Remote (US)");
        assert_eq!(job.salary.as_deref(), Some("$120k - $150k"));
        assert_eq!(job.date_posted, "2 weeks ago");
        assert_eq!(job.url, "https://www.impactsource.ai/jobs/solar-grid-swe");
    }

    #[test]
    fn test_locations_badge_and_absolute_link() {
        let job = &ImpactSource.parse(PAGE)[1];
        assert_eq!(job.location, "London, UK");
        assert_eq!(job.salary, None);
        assert_eq!(job.date_posted, "today");
        assert_eq!(job.url, "https://jobs.example.com/42");
    }

    #[test]
    fn test_empty_remote_badge_and_disclaimer_only_salary() {
        let job = &ImpactSource.parse(PAGE)[2];
        assert_eq!(job.location, "Remote");
        assert_eq!(job.salary, None);
        assert_eq!(job.date_posted, "");
    }
}
