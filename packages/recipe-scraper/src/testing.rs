//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that uses the scraper without
//! launching a browser or making network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::dom::PageSnapshot;
use crate::error::{BrowserError, BrowserResult};
use crate::traits::browser::{Browser, BrowserPage, PageOptions};

/// A mock browser serving canned HTML by URL.
///
/// Clones share pages, failures and the call log, so a test can keep a
/// handle while the scraper owns another.
#[derive(Clone, Default)]
pub struct MockBrowser {
    /// Predefined HTML by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// URLs whose navigation fails
    fail_urls: Arc<RwLock<Vec<String>>>,

    /// Refuse to open pages at all
    fail_open: bool,

    /// Simulated navigation time
    latency: Duration,

    /// Call tracking
    calls: Arc<RwLock<Vec<BrowserCall>>>,
}

/// Record of a call made to the mock browser or one of its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCall {
    Open { proxy: Option<String> },
    Goto { url: String },
    Scroll { pixels: i64 },
    ScrollToTop,
    Close,
}

impl MockBrowser {
    /// Create a new mock browser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Make navigation to `url` fail.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// Make every `open_page` fail.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Delay every navigation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<BrowserCall> {
        self.calls.read().unwrap().clone()
    }

    /// URLs navigated to, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BrowserCall::Goto { url } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn opened_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BrowserCall::Open { .. }))
            .count()
    }

    pub fn closed_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BrowserCall::Close))
            .count()
    }

    fn record(&self, call: BrowserCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn open_page(&self, options: &PageOptions) -> BrowserResult<Box<dyn BrowserPage>> {
        if self.fail_open {
            return Err(BrowserError::Launch("mock browser refused to start".to_string()));
        }

        self.record(BrowserCall::Open {
            proxy: options.proxy.clone(),
        });

        Ok(Box::new(MockPage {
            browser: self.clone(),
            url: None,
            html: None,
        }))
    }
}

/// A page of [`MockBrowser`].
pub struct MockPage {
    browser: MockBrowser,
    url: Option<String>,
    html: Option<String>,
}

impl MockPage {
    fn loaded(&self) -> BrowserResult<(&str, &str)> {
        match (&self.url, &self.html) {
            (Some(url), Some(html)) => Ok((url, html)),
            _ => Err(BrowserError::NotLoaded),
        }
    }
}

#[async_trait]
impl BrowserPage for MockPage {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        self.browser.record(BrowserCall::Goto {
            url: url.to_string(),
        });

        if !self.browser.latency.is_zero() {
            tokio::time::sleep(self.browser.latency).await;
        }

        if self.browser.fail_urls.read().unwrap().iter().any(|u| u == url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "Mock connection refused".to_string(),
            });
        }

        let html = self.browser.pages.read().unwrap().get(url).cloned();
        match html {
            Some(html) => {
                self.url = Some(url.to_string());
                self.html = Some(html);
                Ok(())
            }
            None => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            }),
        }
    }

    async fn wait_for_network_idle(&mut self, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> BrowserResult<()> {
        let (url, html) = self.loaded()?;
        let found = !PageSnapshot::parse(url, html).select_all(selector).is_empty();
        if found {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: selector.to_string(),
            })
        }
    }

    async fn wait_for_hidden(&mut self, _selector: &str, _timeout: Duration) -> BrowserResult<()> {
        Ok(())
    }

    async fn evaluate(&mut self, _script: &str) -> BrowserResult<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    async fn scroll_by(&mut self, pixels: i64) -> BrowserResult<()> {
        self.browser.record(BrowserCall::Scroll { pixels });
        Ok(())
    }

    async fn scroll_to_top(&mut self) -> BrowserResult<()> {
        self.browser.record(BrowserCall::ScrollToTop);
        Ok(())
    }

    async fn content(&mut self) -> BrowserResult<String> {
        self.loaded().map(|(_, html)| html.to_string())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    async fn close(&mut self) -> BrowserResult<()> {
        self.browser.record(BrowserCall::Close);
        Ok(())
    }
}

/// HTML fixtures shaped like the markup the built-in adapters read.
pub mod fixtures {
    /// A recipe page that Cookpad and the WordPress-style adapters can all
    /// extract: `#ingredients`/`#steps` containers with recipe-card classes.
    pub fn recipe_page(title: &str, ingredients: &[&str], steps: &[&str]) -> String {
        let ingredients: String = ingredients
            .iter()
            .map(|i| format!(r#"<li class="ingredient wprm-recipe-ingredient">{}</li>"#, i))
            .collect();
        let steps: String = steps
            .iter()
            .map(|s| {
                format!(
                    r#"<li class="step wprm-recipe-instruction"><div class="wprm-recipe-instruction-text">{}</div></li>"#,
                    s
                )
            })
            .collect();

        format!(
            r#"<html><body><article>
                 <h1 class="entry-title">{}</h1>
                 <div id="ingredients"><ul>{}</ul></div>
                 <div id="steps"><ol>{}</ol></div>
               </article></body></html>"#,
            title, ingredients, steps
        )
    }

    /// A Spanish recipe page that passes validation and language checks.
    pub fn spanish_recipe(title: &str) -> String {
        recipe_page(
            title,
            &["2 tazas de harina", "3 huevos", "1 cucharada de aceite"],
            &[
                "Mezclar la harina con los huevos y el aceite.",
                "Cocinar en el horno a fuego medio durante 20 minutos.",
            ],
        )
    }

    /// An English recipe page.
    pub fn english_recipe(title: &str) -> String {
        recipe_page(
            title,
            &["2 cups flour", "3 eggs", "1 tablespoon oil"],
            &[
                "Mix the flour with the eggs and the oil.",
                "Cook in the oven over medium heat for 20 minutes.",
            ],
        )
    }

    /// A search-results page linking to `urls`.
    pub fn search_page(urls: &[&str]) -> String {
        let items: String = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                format!(
                    r#"<article><h2 class="entry-title"><a href="{}">Receta {}</a></h2></article>"#,
                    url,
                    i + 1
                )
            })
            .collect();

        format!("<html><body><main>{}</main></body></html>", items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;

    #[tokio::test]
    async fn test_mock_browser_serves_pages_and_records_calls() {
        let browser = MockBrowser::new().with_page("https://a.example/", "<h1>A</h1>");
        let options = PageOptions::from_config(&ScraperConfig::default(), Some("http://p:1".into()));

        let mut page = browser.open_page(&options).await.unwrap();
        page.goto("https://a.example/").await.unwrap();
        assert_eq!(page.content().await.unwrap(), "<h1>A</h1>");
        assert!(page.goto("https://missing.example/").await.is_err());
        page.close().await.unwrap();

        assert_eq!(
            browser.calls(),
            vec![
                BrowserCall::Open {
                    proxy: Some("http://p:1".into())
                },
                BrowserCall::Goto {
                    url: "https://a.example/".into()
                },
                BrowserCall::Goto {
                    url: "https://missing.example/".into()
                },
                BrowserCall::Close,
            ]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let browser = MockBrowser::new()
            .with_page("https://a.example/", "<h1>A</h1>")
            .with_failure("https://a.example/");
        let options = PageOptions::from_config(&ScraperConfig::default(), None);

        let mut page = browser.open_page(&options).await.unwrap();
        assert!(matches!(
            page.goto("https://a.example/").await,
            Err(BrowserError::Navigation { .. })
        ));
    }
}
