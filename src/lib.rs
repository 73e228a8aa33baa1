//! Remote Job Boards Library
//!
//! Scrapes remote software jobs from impact-focused job boards with a headless
//! browser, merges them newest first and serves them over a small JSON API.

pub mod aggregate;
pub mod browser;
pub mod companies;
pub mod conf;
pub mod extraction_fallbacks;
pub mod logger;
pub mod normalize;
pub mod scrapers;
pub mod server;
pub mod sorter;
pub mod types;

pub use types::*;
