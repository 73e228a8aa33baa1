//! Aggregation Module
//!
//! Fans out to every source extractor at once, waits for all of them to settle,
//! and merges whatever they returned into one list sorted newest first.

use crate::sorter::{sort_jobs, SortOrder};
use crate::types::{JobListing, Source};
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

/// Anything that can produce listings for one board.
///
/// `extract` never fails: a broken source contributes an empty list.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    fn source(&self) -> Source;
    async fn extract(&self) -> Vec<JobListing>;
}

/// Scrape every source concurrently and return the merged, sorted listings.
///
/// No deduplication and no caching: each call scrapes everything fresh.
pub async fn aggregate(extractors: &[Arc<dyn SourceExtractor>]) -> Vec<JobListing> {
    let tasks = extractors.iter().map(|extractor| {
        let extractor = Arc::clone(extractor);
        tokio::spawn(async move {
            let started = Instant::now();
            let jobs = extractor.extract().await;
            (jobs, started.elapsed())
        })
    });

    // join_all waits for every task; one failure never cuts the others short
    let settled = futures::future::join_all(tasks).await;

    let mut all_jobs = Vec::new();
    for (extractor, outcome) in extractors.iter().zip(settled) {
        let source = extractor.source();
        match outcome {
            Ok((jobs, elapsed)) => {
                info!("Fetched {} jobs from {} in {:.1}s", jobs.len(), source, elapsed.as_secs_f64());
                all_jobs.extend(jobs);
            }
            Err(e) => {
                error!("Extractor task for {} failed: {}", source, e);
            }
        }
    }

    sort_jobs(&mut all_jobs, SortOrder::NewestFirst);
    all_jobs
}
