use serde::{Deserialize, Serialize};
use std::fmt;

/// One job posting, normalized across boards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    /// Relative phrase as scraped ("2 days ago", "Today"); only parsed when sorting.
    pub date_posted: String,
    pub url: String,
    pub source: Source,
}

/// The closed set of job boards we scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Source {
    #[serde(rename = "Tech Jobs For Good")]
    TechJobsForGood,
    #[serde(rename = "ImpactSource.ai")]
    ImpactSource,
    #[serde(rename = "Idealist.org")]
    Idealist,
    #[serde(rename = "Escape the City")]
    EscapeTheCity,
    #[serde(rename = "Climatebase")]
    Climatebase,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::TechJobsForGood,
        Source::ImpactSource,
        Source::Idealist,
        Source::EscapeTheCity,
        Source::Climatebase,
    ];

    /// Label shown to users and written into the JSON `source` field.
    pub fn label(self) -> &'static str {
        match self {
            Source::TechJobsForGood => "Tech Jobs For Good",
            Source::ImpactSource => "ImpactSource.ai",
            Source::Idealist => "Idealist.org",
            Source::EscapeTheCity => "Escape the City",
            Source::Climatebase => "Climatebase",
        }
    }

    /// Short identifier used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Source::TechJobsForGood => "techjobsforgood",
            Source::ImpactSource => "impactsource",
            Source::Idealist => "idealist",
            Source::EscapeTheCity => "escapethecity",
            Source::Climatebase => "climatebase",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Source> {
        let wanted = slug.trim().to_lowercase();
        Source::ALL.into_iter().find(|s| s.slug() == wanted)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields pulled out of one job card before validation.
///
/// Every board fills what it can find and hands the result to [`RawListing::finish`],
/// which is the single place where incomplete candidates get dropped.
#[derive(Debug, Default, Clone)]
pub struct RawListing {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub date_posted: String,
    pub url: String,
}

impl RawListing {
    /// Returns `None` when title or company is missing.
    pub fn finish(self, source: Source, default_location: &str) -> Option<JobListing> {
        if self.title.trim().is_empty() || self.company.trim().is_empty() {
            return None;
        }

        let location = self
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| default_location.to_string());
        let salary = self.salary.filter(|s| !s.trim().is_empty());

        Some(JobListing {
            title: self.title,
            company: self.company,
            location,
            salary,
            date_posted: self.date_posted,
            url: self.url,
            source,
        })
    }
}

/// How a board's scrape ended, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Ok,
    BrowserUnavailable,
    Timeout,
    SelectorMissing,
    NavigationFailed,
    Panicked,
    Error,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Ok => write!(f, "OK"),
            SourceStatus::BrowserUnavailable => write!(f, "BROWSER_UNAVAILABLE"),
            SourceStatus::Timeout => write!(f, "TIMEOUT"),
            SourceStatus::SelectorMissing => write!(f, "SELECTOR_MISSING"),
            SourceStatus::NavigationFailed => write!(f, "NAVIGATION_FAILED"),
            SourceStatus::Panicked => write!(f, "PANICKED"),
            SourceStatus::Error => write!(f, "ERROR"),
        }
    }
}
