//! Run every board (or the ones named on the command line) once and print the
//! merged listings as JSON.
//!
//! Usage: scrape_once [techjobsforgood|impactsource|idealist|escapethecity|climatebase ...]

use anyhow::{bail, Context, Result};
use remote_job_boards::aggregate::aggregate;
use remote_job_boards::browser::WebDriverProvider;
use remote_job_boards::conf::Settings;
use remote_job_boards::scrapers::{extractors, registry};
use remote_job_boards::{logger, Source};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let settings = Settings::new()?;

    let mut wanted = Vec::new();
    for slug in std::env::args().skip(1) {
        match Source::from_slug(&slug) {
            Some(source) => wanted.push(source),
            None => bail!(
                "Unknown board '{}'. Expected one of: {}",
                slug,
                Source::ALL.iter().map(|s| s.slug()).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    let boards = registry()
        .into_iter()
        .filter(|board| wanted.is_empty() || wanted.contains(&board.source()))
        .collect();

    let browser = Arc::new(WebDriverProvider {
        webdriver_url: settings.webdriver_url.clone(),
        headless: settings.headless,
        navigation_timeout: settings.timings().navigation,
    });

    let jobs = aggregate(&extractors(boards, browser, settings.timings())).await;
    log::info!("Collected {} jobs", jobs.len());

    let json = serde_json::to_string_pretty(&jobs).context("Failed to serialize jobs")?;
    println!("{}", json);

    Ok(())
}
