use crate::types::JobListing;
use chrono::{DateTime, Duration, Months, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Reverse;

lazy_static! {
    static ref WEEKS_RE: Regex = Regex::new(r"(\d+)\s*week").unwrap();
    static ref DAYS_RE: Regex = Regex::new(r"(\d+)\s*day").unwrap();
    static ref MONTHS_RE: Regex = Regex::new(r"(\d+)\s*month").unwrap();
}

/// A "posted X ago" phrase, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedAge {
    Today,
    WeeksAgo(i64),
    DaysAgo(i64),
    MonthsAgo(u32),
    Unknown,
}

impl PostedAge {
    /// Rules are tried in order (today, weeks, days, months); the first hit wins.
    pub fn classify(text: &str) -> PostedAge {
        let lower = text.to_lowercase();

        if lower.contains("today") {
            return PostedAge::Today;
        }
        if let Some(n) = capture_number::<i64>(&WEEKS_RE, &lower) {
            return n.map_or(PostedAge::Unknown, PostedAge::WeeksAgo);
        }
        if let Some(n) = capture_number::<i64>(&DAYS_RE, &lower) {
            return n.map_or(PostedAge::Unknown, PostedAge::DaysAgo);
        }
        if let Some(n) = capture_number::<u32>(&MONTHS_RE, &lower) {
            return n.map_or(PostedAge::Unknown, PostedAge::MonthsAgo);
        }

        PostedAge::Unknown
    }

    /// Anything that cannot be represented falls back to the epoch.
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let resolved = match self {
            PostedAge::Today => Some(now),
            PostedAge::WeeksAgo(n) => Duration::try_weeks(n).and_then(|d| now.checked_sub_signed(d)),
            PostedAge::DaysAgo(n) => Duration::try_days(n).and_then(|d| now.checked_sub_signed(d)),
            PostedAge::MonthsAgo(n) => now.checked_sub_months(Months::new(n)),
            PostedAge::Unknown => None,
        };
        resolved.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Outer `None`: pattern did not match. Inner `None`: matched but the number overflowed.
fn capture_number<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<Option<T>> {
    let caps = re.captures(text)?;
    Some(caps.get(1).and_then(|m| m.as_str().parse::<T>().ok()))
}

/// Turn a relative date phrase into a timestamp. Unparseable input sorts as oldest.
pub fn parse_date_posted(text: &str) -> DateTime<Utc> {
    parse_date_posted_at(text, Utc::now())
}

pub fn parse_date_posted_at(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    PostedAge::classify(text).resolve(now)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    /// `oldest` selects ascending order; anything else is newest first.
    pub fn from_query(value: Option<&str>) -> SortOrder {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "oldest" => SortOrder::OldestFirst,
            _ => SortOrder::NewestFirst,
        }
    }
}

/// Stable sort by parsed `date_posted`. Ties keep their input order.
pub fn sort_jobs(jobs: &mut [JobListing], order: SortOrder) {
    sort_jobs_at(jobs, order, Utc::now());
}

pub fn sort_jobs_at(jobs: &mut [JobListing], order: SortOrder, now: DateTime<Utc>) {
    match order {
        SortOrder::NewestFirst => {
            jobs.sort_by_cached_key(|job| Reverse(parse_date_posted_at(&job.date_posted, now)))
        }
        SortOrder::OldestFirst => {
            jobs.sort_by_cached_key(|job| parse_date_posted_at(&job.date_posted, now))
        }
    }
}
