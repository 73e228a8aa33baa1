//! HTTP API
//!
//! Thin actix-web layer over the aggregator and the company directory.

use crate::aggregate::{aggregate, SourceExtractor};
use crate::browser::WebDriverProvider;
use crate::companies::{group_by_company, load_companies, CompanyDirectory};
use crate::conf::Settings;
use crate::scrapers::{extractors, registry};
use crate::sorter::{sort_jobs, SortOrder};
use crate::types::JobListing;
use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppState {
    pub extractors: Vec<Arc<dyn SourceExtractor>>,
    pub companies_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    order: Option<String>,
}

impl OrderQuery {
    fn sort_order(&self) -> SortOrder {
        SortOrder::from_query(self.order.as_deref())
    }
}

fn error_body(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": message }))
}

/// Aggregate on a separate task so a panic turns into an error instead of a dropped connection
async fn fetch_jobs(state: &AppState, order: SortOrder) -> Result<Vec<JobListing>, tokio::task::JoinError> {
    let extractors = state.extractors.clone();
    let mut jobs = tokio::spawn(async move { aggregate(&extractors).await }).await?;
    if order == SortOrder::OldestFirst {
        sort_jobs(&mut jobs, order);
    }
    Ok(jobs)
}

#[get("/api/jobs")]
async fn list_jobs(query: web::Query<OrderQuery>, data: web::Data<AppState>) -> impl Responder {
    match fetch_jobs(&data, query.sort_order()).await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => {
            error!("Error fetching jobs: {}", e);
            error_body("Failed to fetch jobs")
        }
    }
}

#[get("/api/jobs/by-company")]
async fn jobs_by_company(query: web::Query<OrderQuery>, data: web::Data<AppState>) -> impl Responder {
    let order = query.sort_order();
    let jobs = match fetch_jobs(&data, order).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Error fetching jobs: {}", e);
            return error_body("Failed to fetch jobs");
        }
    };

    let directory = load_companies(&data.companies_path).unwrap_or_else(|e| {
        warn!("Company descriptions unavailable: {:#}", e);
        CompanyDirectory::new()
    });

    HttpResponse::Ok().json(group_by_company(jobs, &directory, order))
}

#[get("/api/companies")]
async fn list_companies(data: web::Data<AppState>) -> impl Responder {
    match load_companies(&data.companies_path) {
        Ok(directory) => HttpResponse::Ok().json(directory),
        Err(e) => {
            error!("Error reading companies data: {:#}", e);
            error_body("Failed to load company data")
        }
    }
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

/// API routes, without static files
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(jobs_by_company)
        .service(list_jobs)
        .service(list_companies)
        .service(health_check);
}

pub async fn run(settings: Settings) -> Result<()> {
    let browser = Arc::new(WebDriverProvider {
        webdriver_url: settings.webdriver_url.clone(),
        headless: settings.headless,
        navigation_timeout: settings.timings().navigation,
    });

    let state = web::Data::new(AppState {
        extractors: extractors(registry(), browser, settings.timings()),
        companies_path: PathBuf::from(&settings.companies_path),
    });

    let serve_static = settings.is_production();
    let static_dir = settings.static_dir.clone();
    if serve_static {
        info!("Serving client build from {}", static_dir);
    }

    info!("Server running on http://localhost:{}", settings.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        let static_dir = static_dir.clone();
        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes)
            .configure(move |cfg| {
                if serve_static {
                    cfg.service(actix_files::Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind(("0.0.0.0", settings.port))
    .with_context(|| format!("Failed to bind port {}", settings.port))?
    .run()
    .await
    .context("HTTP server failed")
}
