use crate::scrapers::Timings;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Runtime settings, read from the environment (`PORT`, `NODE_ENV`, `WEBDRIVER_URL`, ...).
#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub node_env: String,
    pub static_dir: String,
    pub companies_path: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub content_wait_secs: u64,
    pub render_grace_secs: u64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(Environment::default().try_parsing(true))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("port", 3000)?
            .set_default("node_env", "development")?
            .set_default("static_dir", "client/dist")?
            .set_default("companies_path", "data/companies.json")?
            .set_default("webdriver_url", "http://localhost:9515")?
            .set_default("headless", true)?
            .set_default("navigation_timeout_secs", 30)?
            .set_default("content_wait_secs", 10)?
            .set_default("render_grace_secs", 3)?
            .add_source(env)
            .build()?;

        conf.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.node_env == "production"
    }

    pub fn timings(&self) -> Timings {
        Timings {
            navigation: Duration::from_secs(self.navigation_timeout_secs),
            content_wait: Duration::from_secs(self.content_wait_secs),
            render_grace: Duration::from_secs(self.render_grace_secs),
        }
    }
}
