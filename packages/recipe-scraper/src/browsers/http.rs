//! Plain HTTP backend.
//!
//! Fetches the server-rendered HTML with reqwest. No JavaScript runs, so
//! settle waits return at once, scrolling is a no-op and script evaluation
//! is unsupported. Good enough for sites that render recipes server-side.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;
use tracing::debug;

use crate::dom::PageSnapshot;
use crate::error::{BrowserError, BrowserResult};
use crate::traits::browser::{Browser, BrowserPage, PageOptions};

/// Browser backend built on a reqwest client per page.
#[derive(Debug, Clone, Default)]
pub struct HttpBrowser;

impl HttpBrowser {
    pub fn new() -> Self {
        Self
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-AR,es;q=0.9,en;q=0.5"));
        headers
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn open_page(&self, options: &PageOptions) -> BrowserResult<Box<dyn BrowserPage>> {
        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .default_headers(Self::default_headers())
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| BrowserError::Launch(format!("invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Box::new(HttpPage {
            client,
            url: None,
            html: None,
        }))
    }
}

/// A fetched document.
pub struct HttpPage {
    client: reqwest::Client,
    url: Option<String>,
    html: Option<String>,
}

impl HttpPage {
    fn loaded(&self) -> BrowserResult<(&str, &str)> {
        match (&self.url, &self.html) {
            (Some(url), Some(html)) => Ok((url, html)),
            _ => Err(BrowserError::NotLoaded),
        }
    }
}

fn has_element(url: &str, html: &str, selector: &str) -> bool {
    !PageSnapshot::parse(url, html).select_all(selector).is_empty()
}

#[async_trait]
impl BrowserPage for HttpPage {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        debug!(url = %url, "HTTP fetch starting");
        let navigation_error = |message: String| BrowserError::Navigation {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation_error(format!("HTTP {}", status)));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| BrowserError::Http(Box::new(e)))?;

        debug!(url = %final_url, bytes = html.len(), "HTTP fetch complete");
        self.url = Some(final_url);
        self.html = Some(html);
        Ok(())
    }

    async fn wait_for_network_idle(&mut self, _timeout: Duration) -> BrowserResult<()> {
        self.loaded().map(|_| ())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        let (url, html) = self.loaded()?;
        if has_element(url, html, selector) {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: selector.to_string(),
            })
        }
    }

    async fn wait_for_hidden(&mut self, _selector: &str, _timeout: Duration) -> BrowserResult<()> {
        self.loaded().map(|_| ())
    }

    async fn evaluate(&mut self, _script: &str) -> BrowserResult<serde_json::Value> {
        Err(BrowserError::Unsupported("script evaluation"))
    }

    async fn scroll_by(&mut self, _pixels: i64) -> BrowserResult<()> {
        Ok(())
    }

    async fn scroll_to_top(&mut self) -> BrowserResult<()> {
        Ok(())
    }

    async fn content(&mut self) -> BrowserResult<String> {
        self.loaded().map(|(_, html)| html.to_string())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    async fn close(&mut self) -> BrowserResult<()> {
        self.url = None;
        self.html = None;
        Ok(())
    }
}
