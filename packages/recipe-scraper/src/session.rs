//! Single-page extraction session.
//!
//! One session drives one page load through
//! `Idle → RateLimitWait → BrowserAcquired → Navigated → ContentSettling →
//! Extracting → Done | Failed`. The page is closed on every path once it
//! has been opened. Settling waits are soft: a timeout is logged and the
//! session carries on with whatever has rendered.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::dispatcher::SiteScraper;
use crate::dom::PageSnapshot;
use crate::error::{BrowserResult, ScrapeError, ScrapeResult};
use crate::traits::browser::{Browser, BrowserPage, PageOptions};
use crate::traits::strategy::ExtractionStrategy;
use crate::types::recipe::ExtractedRecipe;
use crate::types::search::{DietaryFilters, SearchCandidate};

/// Elements whose visibility means the page is still loading.
pub const SPINNER_SELECTOR: &str =
    ".loading, .spinner, .loader, [class*=\"loading\"], [class*=\"spinner\"]";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    RateLimitWait,
    BrowserAcquired,
    Navigated,
    ContentSettling,
    Extracting,
    Done,
    Failed,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Done | SessionPhase::Failed)
    }
}

/// Drives a browser through one page load for a resolved site.
pub struct ExtractionSession<'a> {
    browser: &'a dyn Browser,
    config: &'a ScraperConfig,
    phase: SessionPhase,
}

impl<'a> ExtractionSession<'a> {
    pub fn new(browser: &'a dyn Browser, config: &'a ScraperConfig) -> Self {
        Self {
            browser,
            config,
            phase: SessionPhase::Idle,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Load `url` and extract a recipe with the scraper's strategy.
    ///
    /// The record is returned as extracted; validation is the caller's job.
    pub async fn scrape(&mut self, scraper: &SiteScraper, url: &str) -> ScrapeResult<ExtractedRecipe> {
        let html = self.load(scraper, url).await?;

        self.enter(SessionPhase::Extracting, url);
        let recipe = extract_recipe(scraper.strategy(), url, &html);

        self.enter(SessionPhase::Done, url);
        Ok(recipe)
    }

    /// Load the site's search page and collect up to `limit` candidates.
    pub async fn search(
        &mut self,
        scraper: &SiteScraper,
        keyword: Option<&str>,
        filters: &DietaryFilters,
        limit: usize,
    ) -> ScrapeResult<Vec<SearchCandidate>> {
        let search_url = scraper.strategy().build_search_url(keyword, filters);
        let html = self.load(scraper, &search_url).await?;

        self.enter(SessionPhase::Extracting, &search_url);
        let candidates = extract_candidates(scraper.strategy(), &search_url, &html, limit);
        debug!(
            site = %scraper.site_name(),
            url = %search_url,
            count = candidates.len(),
            "Collected search candidates"
        );

        self.enter(SessionPhase::Done, &search_url);
        Ok(candidates)
    }

    fn enter(&mut self, phase: SessionPhase, url: &str) {
        debug!(url = %url, from = ?self.phase, to = ?phase, "Session phase");
        self.phase = phase;
    }

    /// Throttle, open a page, drive it and always close it.
    async fn load(&mut self, scraper: &SiteScraper, url: &str) -> ScrapeResult<String> {
        self.enter(SessionPhase::RateLimitWait, url);
        scraper.throttle().wait().await;

        let options = PageOptions::from_config(self.config, scraper.proxy().map(str::to_string));
        let mut page = match self.browser.open_page(&options).await {
            Ok(page) => page,
            Err(e) => {
                self.enter(SessionPhase::Failed, url);
                return Err(ScrapeError::Navigation(e));
            }
        };
        self.enter(SessionPhase::BrowserAcquired, url);

        let result = self.drive(page.as_mut(), scraper, url).await;

        if let Err(e) = page.close().await {
            warn!(url = %url, error = %e, "Failed to close page");
        }
        if result.is_err() {
            self.enter(SessionPhase::Failed, url);
        }
        result
    }

    async fn drive(
        &mut self,
        page: &mut dyn BrowserPage,
        scraper: &SiteScraper,
        url: &str,
    ) -> ScrapeResult<String> {
        if let Err(e) = page.goto(url).await {
            scraper.mark_proxy_failed();
            return Err(ScrapeError::Navigation(e));
        }
        self.enter(SessionPhase::Navigated, url);

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        self.enter(SessionPhase::ContentSettling, url);
        soft_wait(
            page.wait_for_network_idle(self.config.network_idle_timeout).await,
            "network idle",
            url,
        );
        soft_wait(
            page.wait_for_hidden(SPINNER_SELECTOR, self.config.spinner_timeout).await,
            "spinners hidden",
            url,
        );
        self.wait_for_ready(page, scraper.strategy().ready_selectors(), url)
            .await;

        if let Some(scroll) = scraper.strategy().lazy_scroll() {
            debug!(url = %url, steps = scroll.steps, "Scrolling to trigger lazy content");
            for _ in 0..scroll.steps {
                soft_wait(page.scroll_by(scroll.distance).await, "scroll", url);
                tokio::time::sleep(scroll.delay).await;
            }
            soft_wait(page.scroll_to_top().await, "scroll to top", url);
        }

        page.content().await.map_err(ScrapeError::Extraction)
    }

    /// Wait for the first ready selector that appears, splitting the budget
    /// evenly across the candidates.
    async fn wait_for_ready(&self, page: &mut dyn BrowserPage, selectors: &[&str], url: &str) {
        if selectors.is_empty() {
            return;
        }

        let per_selector = self.config.selector_wait_budget / selectors.len() as u32;
        for selector in selectors {
            match page.wait_for_selector(selector, per_selector).await {
                Ok(()) => return,
                Err(e) => debug!(url = %url, selector = %selector, error = %e, "Ready selector missing"),
            }
        }

        warn!(url = %url, "No ready selector appeared, extracting anyway");
    }
}

fn soft_wait(result: BrowserResult<()>, what: &str, url: &str) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_timeout() => warn!(url = %url, what = %what, "Soft wait timed out, continuing"),
        Err(e) => debug!(url = %url, what = %what, error = %e, "Soft wait skipped"),
    }
}

fn extract_recipe(strategy: &dyn ExtractionStrategy, url: &str, html: &str) -> ExtractedRecipe {
    let page = PageSnapshot::parse(url, html);
    strategy.extract_recipe(&page, url)
}

fn extract_candidates(
    strategy: &dyn ExtractionStrategy,
    url: &str,
    html: &str,
    limit: usize,
) -> Vec<SearchCandidate> {
    let page = PageSnapshot::parse(url, html);
    strategy.extract_search_results(&page, limit)
}

/// Convenience wrapper for a one-off scrape.
pub async fn scrape_page(
    browser: &dyn Browser,
    config: &ScraperConfig,
    scraper: &SiteScraper,
    url: &str,
) -> ScrapeResult<ExtractedRecipe> {
    ExtractionSession::new(browser, config).scrape(scraper, url).await
}
