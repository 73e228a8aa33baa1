use super::JobBoard;
use crate::browser::BrowserProfile;
use crate::normalize::{absolutize, element_text, select_href, select_non_empty, select_text};
use crate::types::{JobListing, RawListing, Source};
use scraper::{ElementRef, Html, Selector};

const SEARCH_URL: &str = "https://www.escapethecity.org/search/jobs?q=option-remote%253DRemote%2520-%2520100%25C2%25B6%25C2%25B7Remote%2520-%252098%2525%2526option-job-title%253DFull%2520Stack%2520Developer%25C2%25B7Back%2520End%2520Developer%25C2%25B7CTO%25C2%25B7Front%2520End%2520Developer%2526featured-tags%253DFlex%2520hours%25C2%25B7Remote%2520-%2520Anywhere";
const ORIGIN: &str = "https://www.escapethecity.org";

/// Shown instead of a figure when the salary is on request
const SALARY_PLACEHOLDER: &str = "Enquire";

pub struct EscapeTheCity;

impl JobBoard for EscapeTheCity {
    fn source(&self) -> Source {
        Source::EscapeTheCity
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
        let Ok(card_sel) = Selector::parse(".job-card.job") else {
            return vec![];
        };

        document
            .select(&card_sel)
            .filter_map(|card| {
                let href = select_href(&card, r#"a[href*="/opportunity/"]"#).unwrap_or_default();

                RawListing {
                    title: select_text(&card, ".job-card__title").unwrap_or_default(),
                    company: select_text(&card, ".job-card__org-name").unwrap_or_default(),
                    location: location(&card),
                    salary: select_text(&card, ".job-card__salary-text")
                        .filter(|s| s != SALARY_PLACEHOLDER),
                    date_posted: select_text(&card, ".posted-date").unwrap_or_default(),
                    url: absolutize(ORIGIN, &href),
                }
                .finish(Source::EscapeTheCity, "Not specified")
            })
            .collect()
    }
}

/// First tag mentioning Remote, then the location line
fn location(card: &ElementRef) -> Option<String> {
    let remote_tag = Selector::parse(".tag").ok().and_then(|tag_sel| {
        card.select(&tag_sel)
            .map(|tag| element_text(&tag))
            .find(|text| text.contains("Remote"))
    });

    remote_tag.or_else(|| select_non_empty(card, ".job-card__location"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><body>
      <div class="job-card job">
        <a href="/opportunity/9001/full-stack-developer">
          <h3 class="job-card__title">Full Stack Developer</h3>
        </a>
        <p class="job-card__org-name">Ecosia</p>
        <div class="tags"><span class="tag">Flex hours</span><span class="tag">Remote - 100%</span></div>
        <div class="job-card__location">Berlin</div>
        <span class="job-card__salary-text">£60,000 - £70,000</span>
        <span class="posted-date">4 days ago</span>
      </div>
      <div class="job-card job">
        <a href="/opportunity/9002/cto">
          <h3 class="job-card__title">CTO</h3>
        </a>
        <p class="job-card__org-name">Too Good To Go</p>
        <div class="job-card__location">Copenhagen</div>
        <span class="job-card__salary-text">Enquire</span>
        <span class="posted-date">1 month ago</span>
      </div>
      <div class="job-card job">
        <h3 class="job-card__title">Back End Developer</h3>
        <p class="job-card__org-name">Olio</p>
      </div>
      <div class="job-card">
        <h3 class="job-card__title">Not A Job Card</h3>
        <p class="job-card__org-name">Ignored</p>
      </div>
    </body></html>
    "#;

    #[test]
    fn test_remote_tag_wins_over_location() {
        let jobs = EscapeTheCity.parse(PAGE);
        assert_eq!(jobs.len(), 3);

        let job = &jobs[0];
        assert_eq!(job.title, "Full Stack Developer");
        assert_eq!(job.company, "Ecosia");
        assert_eq!(job.location, "Remote - 100%");
        assert_eq!(job.salary.as_deref(), Some("£60,000 - £70,000"));
        assert_eq!(job.date_posted, "4 days ago");
        assert_eq!(job.url, "https://www.escapethecity.org/opportunity/9001/full-stack-developer");
    }

    #[test]
    fn test_enquire_salary_is_absent() {
        let job = &EscapeTheCity.parse(PAGE)[1];
        assert_eq!(job.location, "Copenhagen");
        assert_eq!(job.salary, None);
    }

    #[test]
    fn test_sparse_card_defaults() {
        let job = &EscapeTheCity.parse(PAGE)[2];
        assert_eq!(job.location, "Not specified");
        assert_eq!(job.url, "");
        assert_eq!(job.date_posted, "");
    }
}
