//! Region offer listing, rendered in headless Chromium or fetched directly.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use flyer_core::{ListingMode, Offer};
use futures::StreamExt;

use crate::client::FlyerClient;
use crate::error::ScraperError;
use crate::listing::{listing_url, parse_listing};

/// Headless browser launch settings.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Chromium executable; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Fixed delay after navigation so client-side rendering can finish.
    pub render_wait: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            render_wait: Duration::from_secs(5),
        }
    }
}

/// Enumerates the offers on a region's listing page.
#[derive(Debug, Clone)]
pub struct RegionLister {
    mode: ListingMode,
    client: FlyerClient,
    browser: BrowserSettings,
}

impl RegionLister {
    #[must_use]
    pub fn new(mode: ListingMode, client: FlyerClient, browser: BrowserSettings) -> Self {
        Self {
            mode,
            client,
            browser,
        }
    }

    /// Loads `<base_url>/en/<country>/<region>/offers` and returns its offers
    /// in page order.
    ///
    /// # Errors
    ///
    /// Any failure is returned as-is: an unreachable page, a browser crash, or
    /// a listing that does not have the expected structure (see
    /// [`parse_listing`]).
    pub async fn list_offers(
        &self,
        base_url: &str,
        country: &str,
        region: &str,
    ) -> Result<Vec<Offer>, ScraperError> {
        let url = listing_url(base_url, country, region)?;
        let html = self.fetch_listing_html(&url).await?;
        let offers = parse_listing(&html, &url)?;
        tracing::info!(country, region, url, offers = offers.len(), "listed region offers");
        Ok(offers)
    }

    /// Returns the listing page markup for `url` according to the configured
    /// [`ListingMode`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] for launch/navigation failures, or
    /// the HTTP errors of [`FlyerClient::fetch_html`].
    pub async fn fetch_listing_html(&self, url: &str) -> Result<String, ScraperError> {
        match self.mode {
            ListingMode::Http => self.client.fetch_html(url).await,
            ListingMode::Browser => render_with_browser(&self.browser, url).await,
        }
    }
}

/// Launches one Chromium process, renders `url`, and tears the process down
/// before returning, whether or not rendering succeeded.
async fn render_with_browser(settings: &BrowserSettings, url: &str) -> Result<String, ScraperError> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage");
    if let Some(path) = &settings.chrome_path {
        builder = builder.chrome_executable(path);
    }
    let config = builder.build().map_err(ScraperError::Browser)?;

    tracing::debug!(url, "launching headless browser");
    let (mut browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!(error = %e, "browser handler error");
            }
        }
    });

    let rendered = render_page(&browser, url, settings.render_wait).await;

    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "failed to close headless browser");
    }
    if let Err(e) = browser.wait().await {
        tracing::debug!(error = %e, "failed to reap headless browser process");
    }
    handler_task.abort();

    rendered
}

async fn render_page(browser: &Browser, url: &str, wait: Duration) -> Result<String, ScraperError> {
    let page = browser.new_page(url).await.map_err(browser_error)?;
    page.wait_for_navigation().await.map_err(browser_error)?;
    tokio::time::sleep(wait).await;
    page.content().await.map_err(browser_error)
}

fn browser_error(e: CdpError) -> ScraperError {
    ScraperError::Browser(e.to_string())
}
