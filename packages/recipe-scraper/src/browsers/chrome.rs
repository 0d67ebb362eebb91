//! Headless Chrome backend (feature `chrome`).
//!
//! headless_chrome is a blocking API, so every call runs on tokio's blocking
//! pool. Each page launches its own browser process: proxies are a launch
//! flag in Chrome, and a process per page keeps contexts isolated.

use async_trait::async_trait;
use headless_chrome::{Browser as Chrome, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{BrowserError, BrowserResult};
use crate::traits::browser::{Browser, BrowserPage, PageOptions};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run a blocking Chrome call off the async runtime.
async fn blocking<T, F>(f: F) -> BrowserResult<T>
where
    F: FnOnce() -> BrowserResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| BrowserError::Launch(format!("browser worker failed: {}", e)))?
}

/// Launches a Chrome process per page.
#[derive(Debug, Clone, Default)]
pub struct ChromeBrowser;

impl ChromeBrowser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn open_page(&self, options: &PageOptions) -> BrowserResult<Box<dyn BrowserPage>> {
        let options = options.clone();

        let (chrome, tab) = blocking(move || {
            let launch = LaunchOptions::default_builder()
                .headless(options.headless)
                .window_size(Some((options.viewport.width, options.viewport.height)))
                .proxy_server(options.proxy.as_deref())
                .build()
                .map_err(|e| BrowserError::Launch(e.to_string()))?;

            let chrome = Chrome::new(launch).map_err(|e| BrowserError::Launch(e.to_string()))?;
            let tab = chrome
                .new_tab()
                .map_err(|e| BrowserError::Launch(e.to_string()))?;
            tab.set_default_timeout(options.timeout);
            tab.set_user_agent(&options.user_agent, Some("es-AR,es;q=0.9"), None)
                .map_err(|e| BrowserError::Launch(e.to_string()))?;

            Ok((chrome, tab))
        })
        .await?;

        debug!("Chrome page opened");
        Ok(Box::new(ChromePage {
            _chrome: chrome,
            tab,
            url: None,
        }))
    }
}

/// One Chrome tab plus the process that owns it.
pub struct ChromePage {
    _chrome: Chrome,
    tab: Arc<Tab>,
    url: Option<String>,
}

impl ChromePage {
    async fn evaluate_value(&self, script: String) -> BrowserResult<serde_json::Value> {
        let tab = self.tab.clone();
        blocking(move || {
            let result = tab
                .evaluate(&script, true)
                .map_err(|e| BrowserError::Script(e.to_string()))?;
            Ok(result.value.unwrap_or(serde_json::Value::Null))
        })
        .await
    }

    /// Poll a boolean script until it is true or the budget runs out.
    async fn poll_until(&self, script: String, what: &str, timeout: Duration) -> BrowserResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.evaluate_value(script.clone()).await? == serde_json::Value::Bool(true) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: what.to_string(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&mut self, url: &str) -> BrowserResult<()> {
        let tab = self.tab.clone();
        let target = url.to_string();

        let final_url = blocking(move || {
            let navigation_error = |message: String| BrowserError::Navigation {
                url: target.clone(),
                message,
            };
            tab.navigate_to(&target)
                .map_err(|e| navigation_error(e.to_string()))?
                .wait_until_navigated()
                .map_err(|e| navigation_error(e.to_string()))?;
            Ok(tab.get_url())
        })
        .await?;

        debug!(url = %final_url, "Chrome navigation complete");
        self.url = Some(final_url);
        Ok(())
    }

    async fn wait_for_network_idle(&mut self, timeout: Duration) -> BrowserResult<()> {
        self.poll_until(
            "document.readyState === 'complete'".to_string(),
            "network idle",
            timeout,
        )
        .await
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let tab = self.tab.clone();
        let selector = selector.to_string();
        blocking(move || {
            tab.wait_for_element_with_custom_timeout(&selector, timeout)
                .map(|_| ())
                .map_err(|_| BrowserError::Timeout { what: selector })
        })
        .await
    }

    async fn wait_for_hidden(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let quoted = serde_json::to_string(selector).map_err(|e| BrowserError::Script(e.to_string()))?;
        let script = format!(
            "!Array.from(document.querySelectorAll({})).some(el => el.offsetParent !== null)",
            quoted
        );
        self.poll_until(script, selector, timeout).await
    }

    async fn evaluate(&mut self, script: &str) -> BrowserResult<serde_json::Value> {
        self.evaluate_value(script.to_string()).await
    }

    async fn content(&mut self) -> BrowserResult<String> {
        if self.url.is_none() {
            return Err(BrowserError::NotLoaded);
        }
        let tab = self.tab.clone();
        blocking(move || {
            tab.get_content()
                .map_err(|e| BrowserError::Script(e.to_string()))
        })
        .await
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    async fn close(&mut self) -> BrowserResult<()> {
        let tab = self.tab.clone();
        self.url = None;
        blocking(move || {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| BrowserError::Launch(e.to_string()))
        })
        .await
    }
}
