//! Headless Browser Module
//!
//! Scoped browser sessions for boards that render their listings client-side.
//!
//! A [`BrowserProvider`] opens one [`BrowserSession`] per scrape. [`fetch_rendered`]
//! owns that session for the whole page visit and always closes it, whether the
//! visit succeeds, returns an error, or panics.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::FutureExt;
use log::{debug, warn};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};

/// Desktop Chrome user agent for boards with bot detection
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => false });";

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Per-board browser settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserProfile {
    pub viewport: Option<(u32, u32)>,
    pub user_agent: Option<&'static str>,
    /// Suppress automation-detectable browser properties
    pub stealth: bool,
}

impl BrowserProfile {
    /// Spoofed desktop browser for boards that block automation
    pub fn disguised() -> Self {
        BrowserProfile {
            viewport: Some((1920, 1080)),
            user_agent: Some(DESKTOP_USER_AGENT),
            stealth: true,
        }
    }
}

/// One readiness step after navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStep {
    /// Give client-side rendering time to finish
    Grace(Duration),
    /// Wait until `css` matches, failing after `timeout`
    Selector { css: &'static str, timeout: Duration },
}

/// Everything needed to load one search page
#[derive(Debug, Clone)]
pub struct PagePlan {
    pub url: &'static str,
    pub profile: BrowserProfile,
    pub waits: Vec<WaitStep>,
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<()>;
    async fn page_source(&self) -> Result<String>;
    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait BrowserProvider: Send + Sync {
    async fn open(&self, profile: &BrowserProfile) -> Result<Box<dyn BrowserSession>>;
}

/// Load `plan.url`, run its waits and return the rendered HTML.
///
/// The session is closed on every path out of this function.
pub async fn fetch_rendered(provider: &dyn BrowserProvider, plan: &PagePlan) -> Result<String> {
    let session = provider
        .open(&plan.profile)
        .await
        .context("Failed to open browser session")?;

    let outcome = AssertUnwindSafe(load_page(session.as_ref(), plan))
        .catch_unwind()
        .await;

    if let Err(e) = session.close().await {
        warn!("Failed to close browser session for {}: {:#}", plan.url, e);
    }

    match outcome {
        Ok(result) => result,
        Err(_) => Err(anyhow!("Browser task panicked while loading {}", plan.url)),
    }
}

async fn load_page(session: &dyn BrowserSession, plan: &PagePlan) -> Result<String> {
    session
        .goto(plan.url)
        .await
        .with_context(|| format!("Failed to navigate to {}", plan.url))?;

    for step in &plan.waits {
        match step {
            WaitStep::Grace(duration) => tokio::time::sleep(*duration).await,
            WaitStep::Selector { css, timeout } => session
                .wait_for(css, *timeout)
                .await
                .with_context(|| format!("Timed out waiting for selector {}", css))?,
        }
    }

    session.page_source().await.context("Failed to get page source")
}

/// ChromeDriver-backed provider
#[derive(Debug, Clone)]
pub struct WebDriverProvider {
    pub webdriver_url: String,
    pub headless: bool,
    pub navigation_timeout: Duration,
}

impl WebDriverProvider {
    fn capabilities(&self, profile: &BrowserProfile) -> WebDriverResult<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-setuid-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-gpu")?;

        if let Some((width, height)) = profile.viewport {
            caps.add_arg(&format!("--window-size={},{}", width, height))?;
        }
        if let Some(user_agent) = profile.user_agent {
            caps.add_arg(&format!("--user-agent={}", user_agent))?;
        }
        if profile.stealth {
            caps.add_arg("--disable-blink-features=AutomationControlled")?;
        }
        Ok(caps)
    }

    async fn prepare(&self, driver: &WebDriver, profile: &BrowserProfile) -> Result<()> {
        driver
            .set_page_load_timeout(self.navigation_timeout)
            .await
            .context("Failed to set page load timeout")?;

        if profile.stealth {
            let dev_tools = ChromeDevTools::new(driver.handle.clone());
            dev_tools
                .execute_cdp_with_params(
                    "Page.addScriptToEvaluateOnNewDocument",
                    serde_json::json!({ "source": HIDE_WEBDRIVER_SCRIPT }),
                )
                .await
                .context("Failed to install webdriver override")?;
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserProvider for WebDriverProvider {
    async fn open(&self, profile: &BrowserProfile) -> Result<Box<dyn BrowserSession>> {
        let caps = self
            .capabilities(profile)
            .context("Failed to build Chrome capabilities")?;

        let driver = WebDriver::new(self.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("Failed to connect to ChromeDriver at {}", self.webdriver_url))?;

        // Once the driver exists, a failed setup must still quit it
        if let Err(e) = self.prepare(&driver, profile).await {
            if let Err(quit_err) = driver.quit().await {
                warn!("Failed to quit browser after setup error: {}", quit_err);
            }
            return Err(e);
        }

        debug!("Opened browser session via {}", self.webdriver_url);
        Ok(Box::new(WebDriverSession { driver }))
    }
}

struct WebDriverSession {
    driver: WebDriver,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<()> {
        self.driver
            .query(By::Css(css))
            .wait(timeout, SELECTOR_POLL_INTERVAL)
            .first()
            .await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy, PartialEq)]
    enum Failure {
        None,
        Goto,
        Wait,
        Panic,
    }

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct CountingProvider {
        counters: Arc<Counters>,
        failure: Failure,
        refuse_open: bool,
    }

    struct CountingSession {
        counters: Arc<Counters>,
        failure: Failure,
    }

    #[async_trait]
    impl BrowserProvider for CountingProvider {
        async fn open(&self, _profile: &BrowserProfile) -> Result<Box<dyn BrowserSession>> {
            if self.refuse_open {
                return Err(anyhow!("connection refused"));
            }
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingSession {
                counters: Arc::clone(&self.counters),
                failure: self.failure,
            }))
        }
    }

    #[async_trait]
    impl BrowserSession for CountingSession {
        async fn goto(&self, _url: &str) -> Result<()> {
            match self.failure {
                Failure::Goto => Err(anyhow!("net::ERR_NAME_NOT_RESOLVED")),
                Failure::Panic => panic!("page crashed"),
                _ => Ok(()),
            }
        }

        async fn wait_for(&self, _css: &str, _timeout: Duration) -> Result<()> {
            if self.failure == Failure::Wait {
                return Err(anyhow!("element not found"));
            }
            Ok(())
        }

        async fn page_source(&self) -> Result<String> {
            Ok("<html><body>ok</body></html>".to_string())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn plan() -> PagePlan {
        PagePlan {
            url: "https://example.org/jobs",
            profile: BrowserProfile::default(),
            waits: vec![
                WaitStep::Grace(Duration::from_millis(1)),
                WaitStep::Selector {
                    css: ".job",
                    timeout: Duration::from_millis(5),
                },
            ],
        }
    }

    async fn run(failure: Failure) -> (Result<String>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let provider = CountingProvider {
            counters: Arc::clone(&counters),
            failure,
            refuse_open: false,
        };
        let result = fetch_rendered(&provider, &plan()).await;
        (result, counters)
    }

    #[tokio::test]
    async fn test_session_released_on_success() {
        let (result, counters) = run(Failure::None).await;
        assert!(result.unwrap().contains("ok"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_released_on_navigation_error() {
        let (result, counters) = run(Failure::Goto).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to navigate"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_released_on_wait_timeout() {
        let (result, counters) = run(Failure::Wait).await;
        assert!(format!("{:#}", result.unwrap_err()).contains("Timed out waiting for selector"));
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_released_on_panic() {
        let (result, counters) = run(Failure::Panic).await;
        assert!(format!("{:#}", result.unwrap_err()).contains("panicked"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_failure_acquires_nothing() {
        let counters = Arc::new(Counters::default());
        let provider = CountingProvider {
            counters: Arc::clone(&counters),
            failure: Failure::None,
            refuse_open: true,
        };
        let result = fetch_rendered(&provider, &plan()).await;
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to open browser session"));
        assert_eq!(counters.opened.load(Ordering::SeqCst), 0);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disguised_profile() {
        let profile = BrowserProfile::disguised();
        assert_eq!(profile.viewport, Some((1920, 1080)));
        assert_eq!(profile.user_agent, Some(DESKTOP_USER_AGENT));
        assert!(profile.stealth);
    }

    #[test]
    fn test_capabilities_build_for_every_profile() {
        let provider = WebDriverProvider {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
        };
        assert!(provider.capabilities(&BrowserProfile::default()).is_ok());
        assert!(provider.capabilities(&BrowserProfile::disguised()).is_ok());
    }
}
