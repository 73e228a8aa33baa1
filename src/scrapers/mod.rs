mod climatebase;
mod escapethecity;
mod idealist;
mod impactsource;
mod techjobsforgood;

pub use climatebase::Climatebase;
pub use escapethecity::EscapeTheCity;
pub use idealist::Idealist;
pub use impactsource::ImpactSource;
pub use techjobsforgood::TechJobsForGood;

use crate::aggregate::SourceExtractor;
use crate::browser::{fetch_rendered, BrowserProfile, BrowserProvider, PagePlan, WaitStep};
use crate::types::{JobListing, Source, SourceStatus};
use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

/// Navigation and readiness timings shared by all boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub navigation: Duration,
    pub content_wait: Duration,
    pub render_grace: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            navigation: Duration::from_secs(30),
            content_wait: Duration::from_secs(10),
            render_grace: Duration::from_secs(3),
        }
    }
}

/// Site-specific knowledge for one job board.
///
/// `parse` works on the rendered HTML only, so it can be exercised without a browser.
pub trait JobBoard: Send + Sync {
    fn source(&self) -> Source;

    /// Search page pre-filtered for remote software engineering roles
    fn search_url(&self) -> &'static str;

    /// Scheme and host used to resolve relative links
    fn origin(&self) -> &'static str;

    fn profile(&self) -> BrowserProfile {
        BrowserProfile::default()
    }

    fn readiness(&self, timings: &Timings) -> Vec<WaitStep> {
        vec![WaitStep::Grace(timings.render_grace)]
    }

    fn parse(&self, html: &str) -> Vec<JobListing>;

    /// Post-extraction filter
    fn retain(&self, _job: &JobListing) -> bool {
        true
    }
}

/// Every board we scrape, in response order
pub fn registry() -> Vec<Arc<dyn JobBoard>> {
    vec![
        Arc::new(TechJobsForGood),
        Arc::new(ImpactSource),
        Arc::new(Idealist),
        Arc::new(EscapeTheCity),
        Arc::new(Climatebase),
    ]
}

/// Wrap boards as extractors sharing one browser provider
pub fn extractors(
    boards: Vec<Arc<dyn JobBoard>>,
    browser: Arc<dyn BrowserProvider>,
    timings: Timings,
) -> Vec<Arc<dyn SourceExtractor>> {
    boards
        .into_iter()
        .map(|board| {
            Arc::new(BoardScraper::new(board, Arc::clone(&browser), timings)) as Arc<dyn SourceExtractor>
        })
        .collect()
}

/// Runs one board through a fresh browser session
pub struct BoardScraper {
    board: Arc<dyn JobBoard>,
    browser: Arc<dyn BrowserProvider>,
    timings: Timings,
}

impl BoardScraper {
    pub fn new(board: Arc<dyn JobBoard>, browser: Arc<dyn BrowserProvider>, timings: Timings) -> Self {
        BoardScraper { board, browser, timings }
    }

    fn plan(&self) -> PagePlan {
        PagePlan {
            url: self.board.search_url(),
            profile: self.board.profile(),
            waits: self.board.readiness(&self.timings),
        }
    }

    async fn scrape(&self) -> Result<Vec<JobListing>> {
        let html = fetch_rendered(self.browser.as_ref(), &self.plan()).await?;
        let jobs = self
            .board
            .parse(&html)
            .into_iter()
            .filter(|job| self.board.retain(job))
            .collect();
        Ok(jobs)
    }
}

#[async_trait]
impl SourceExtractor for BoardScraper {
    fn source(&self) -> Source {
        self.board.source()
    }

    async fn extract(&self) -> Vec<JobListing> {
        let source = self.board.source();
        info!("Scraping {}: {}", source, self.board.search_url());

        match self.scrape().await {
            Ok(jobs) => {
                info!("[{}] {} - {} jobs", source, SourceStatus::Ok, jobs.len());
                jobs
            }
            Err(e) => {
                error!("Error scraping {} [{}]: {:#}", source, classify_error(&e), e);
                vec![]
            }
        }
    }
}

/// Map a scrape error chain onto a status for the log line
pub fn classify_error(err: &anyhow::Error) -> SourceStatus {
    let chain = format!("{:#}", err).to_lowercase();

    if chain.contains("panicked") {
        SourceStatus::Panicked
    } else if chain.contains("failed to open browser session") {
        SourceStatus::BrowserUnavailable
    } else if chain.contains("timed out waiting for selector") {
        SourceStatus::SelectorMissing
    } else if chain.contains("timeout") || chain.contains("timed out") {
        SourceStatus::Timeout
    } else if chain.contains("failed to navigate") {
        SourceStatus::NavigationFailed
    } else {
        SourceStatus::Error
    }
}
