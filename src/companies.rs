use crate::sorter::{parse_date_posted_at, SortOrder};
use crate::types::JobListing;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Company name to a short description of what they do
pub type CompanyDirectory = BTreeMap<String, String>;

/// All listings of one employer, as shown in the company view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyGroup {
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub jobs: Vec<JobListing>,
}

pub fn load_companies(path: &Path) -> Result<CompanyDirectory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read company data from {:?}", path))?;

    let directory: CompanyDirectory = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse company data in {:?}", path))?;

    Ok(directory)
}

/// Group listings by exact company name, busiest-recent employers first.
pub fn group_by_company(
    jobs: Vec<JobListing>,
    directory: &CompanyDirectory,
    order: SortOrder,
) -> Vec<CompanyGroup> {
    group_by_company_at(jobs, directory, order, Utc::now())
}

pub fn group_by_company_at(
    jobs: Vec<JobListing>,
    directory: &CompanyDirectory,
    order: SortOrder,
    now: DateTime<Utc>,
) -> Vec<CompanyGroup> {
    let mut groups: Vec<CompanyGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for job in jobs {
        let slot = *index.entry(job.company.clone()).or_insert_with(|| {
            groups.push(CompanyGroup {
                company: job.company.clone(),
                description: directory.get(&job.company).cloned(),
                jobs: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].jobs.push(job);
    }

    let newest = |group: &CompanyGroup| {
        group
            .jobs
            .iter()
            .map(|job| parse_date_posted_at(&job.date_posted, now))
            .max()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    };

    // Stable sorts: groups with the same newest date keep first-appearance order
    match order {
        SortOrder::NewestFirst => groups.sort_by_cached_key(|g| Reverse(newest(g))),
        SortOrder::OldestFirst => groups.sort_by_cached_key(newest),
    }

    groups
}
