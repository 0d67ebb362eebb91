//! Browser automation contract.
//!
//! The engine needs a small capability set from a browser: open an isolated
//! page (user agent, viewport, optional proxy), navigate, wait, run script,
//! scroll, and hand back the rendered HTML. DOM queries happen afterwards on
//! a [`PageSnapshot`](crate::dom::PageSnapshot).

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{ScraperConfig, Viewport};
use crate::error::BrowserResult;

/// Settings for one isolated browsing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub user_agent: String,
    pub viewport: Viewport,

    /// Upstream proxy URL, e.g. `http://host:8080`
    pub proxy: Option<String>,

    /// Navigation timeout
    pub timeout: Duration,

    pub headless: bool,
}

impl PageOptions {
    /// Options from scraper configuration, with an optional proxy.
    pub fn from_config(config: &ScraperConfig, proxy: Option<String>) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            viewport: config.viewport,
            proxy,
            timeout: config.page_timeout,
            headless: config.headless,
        }
    }
}

/// Opens pages.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a fresh page in its own browsing context.
    async fn open_page(&self, options: &PageOptions) -> BrowserResult<Box<dyn BrowserPage>>;
}

/// One open page. Callers must `close()` it on every path.
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigate and wait for the document to load.
    async fn goto(&mut self, url: &str) -> BrowserResult<()>;

    /// Wait until no network requests are in flight.
    async fn wait_for_network_idle(&mut self, timeout: Duration) -> BrowserResult<()>;

    /// Wait until an element matching `selector` exists.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Wait until no visible element matches `selector`.
    async fn wait_for_hidden(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Evaluate a script in the page and return its JSON result.
    async fn evaluate(&mut self, script: &str) -> BrowserResult<serde_json::Value>;

    /// Scroll the window vertically.
    async fn scroll_by(&mut self, pixels: i64) -> BrowserResult<()> {
        self.evaluate(&format!("window.scrollBy(0, {})", pixels))
            .await
            .map(|_| ())
    }

    async fn scroll_to_top(&mut self) -> BrowserResult<()> {
        self.evaluate("window.scrollTo(0, 0)").await.map(|_| ())
    }

    /// Rendered HTML of the current document.
    async fn content(&mut self) -> BrowserResult<String>;

    /// URL of the current document, after redirects.
    fn current_url(&self) -> Option<String>;

    /// Release the page and its browsing context.
    async fn close(&mut self) -> BrowserResult<()>;
}
