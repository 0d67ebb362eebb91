//! Scraper and bulk-search configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::heuristics::Language;

/// Desktop Chrome user agent sent by every backend.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Configuration for single-page scraping sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Navigation timeout for one page load.
    ///
    /// Env: `SCRAPER_TIMEOUT` (milliseconds). Default: 30 s.
    pub page_timeout: Duration,

    /// Run the browser without a window.
    ///
    /// Env: `SCRAPER_HEADLESS`. Default: true.
    pub headless: bool,

    /// Minimum interval between two requests of the same site scraper.
    ///
    /// Env: `RATE_LIMIT_DELAY` (seconds, fractional). Zero disables it.
    /// Default: 2 s.
    pub min_request_interval: Duration,

    /// Route requests through the proxy pool.
    ///
    /// Env: `PROXY_ENABLED`. Default: false.
    pub proxy_enabled: bool,

    /// One proxy URL per line.
    ///
    /// Env: `PROXY_LIST_FILE`. Default: `proxies.txt`.
    pub proxy_list_file: String,

    /// Fixed sleep after navigation, before the soft waits.
    pub settle_delay: Duration,

    /// Budget for the network-idle soft wait.
    pub network_idle_timeout: Duration,

    /// Budget for the spinner-absence soft wait.
    pub spinner_timeout: Duration,

    /// Total budget for ready-selector waits, split across candidates.
    pub selector_wait_budget: Duration,

    pub user_agent: String,
    pub viewport: Viewport,

    /// Records detected in another known language are rejected.
    pub accepted_language: Language,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_millis(30_000),
            headless: true,
            min_request_interval: Duration::from_secs(2),
            proxy_enabled: false,
            proxy_list_file: "proxies.txt".to_string(),
            settle_delay: Duration::from_secs(2),
            network_idle_timeout: Duration::from_secs(10),
            spinner_timeout: Duration::from_secs(5),
            selector_wait_budget: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: Viewport::default(),
            accepted_language: Language::Es,
        }
    }
}

impl ScraperConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present. Unset variables keep
    /// their defaults; set but unparseable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64>("SCRAPER_TIMEOUT")? {
            config.page_timeout = Duration::from_millis(ms);
        }
        if let Ok(raw) = env::var("SCRAPER_HEADLESS") {
            config.headless = parse_bool("SCRAPER_HEADLESS", &raw)?;
        }
        if let Some(secs) = parse_var::<f64>("RATE_LIMIT_DELAY")? {
            config.min_request_interval =
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::Invalid {
                    key: "RATE_LIMIT_DELAY",
                    value: secs.to_string(),
                })?;
        }
        if let Ok(raw) = env::var("PROXY_ENABLED") {
            config.proxy_enabled = parse_bool("PROXY_ENABLED", &raw)?;
        }
        if let Ok(path) = env::var("PROXY_LIST_FILE") {
            config.proxy_list_file = path;
        }

        Ok(config)
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_proxy_enabled(mut self, enabled: bool) -> Self {
        self.proxy_enabled = enabled;
        self
    }

    pub fn with_proxy_list_file(mut self, path: impl Into<String>) -> Self {
        self.proxy_list_file = path.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set all three soft-wait budgets at once.
    pub fn with_soft_wait_timeouts(mut self, timeout: Duration) -> Self {
        self.network_idle_timeout = timeout;
        self.spinner_timeout = timeout;
        self.selector_wait_budget = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    pub fn with_accepted_language(mut self, language: Language) -> Self {
        self.accepted_language = language;
        self
    }

    /// Zero-delay settings for tests and offline fixtures.
    pub fn immediate() -> Self {
        Self::default()
            .with_min_request_interval(Duration::ZERO)
            .with_settle_delay(Duration::ZERO)
            .with_soft_wait_timeouts(Duration::from_millis(50))
    }
}

/// Configuration for bulk multi-site search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Limits at or below this run sites concurrently. Default: 50.
    pub parallel_threshold: usize,

    /// Sites per concurrent batch. Default: 3.
    pub max_parallel: usize,

    /// Pause between sites in sequential mode. Default: 3 s.
    pub sequential_delay: Duration,

    /// Largest accepted result limit. Default: 1000.
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 50,
            max_parallel: 3,
            sequential_delay: Duration::from_secs(3),
            max_limit: 1000,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_max_parallel(mut self, width: usize) -> Self {
        self.max_parallel = width.max(1);
        self
    }

    pub fn with_sequential_delay(mut self, delay: Duration) -> Self {
        self.sequential_delay = delay;
        self
    }

    pub fn with_max_limit(mut self, max: usize) -> Self {
        self.max_limit = max;
        self
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.page_timeout, Duration::from_secs(30));
        assert!(config.headless);
        assert_eq!(config.min_request_interval, Duration::from_secs(2));
        assert!(!config.proxy_enabled);
        assert_eq!(config.proxy_list_file, "proxies.txt");
        assert_eq!(config.viewport, Viewport { width: 1280, height: 720 });
        assert_eq!(config.accepted_language, Language::Es);

        let search = SearchConfig::default();
        assert_eq!(search.parallel_threshold, 50);
        assert_eq!(search.max_parallel, 3);
        assert_eq!(search.sequential_delay, Duration::from_secs(3));
        assert_eq!(search.max_limit, 1000);
    }

    #[test]
    fn test_parse_bool() {
        for raw in ["true", "TRUE", "1", " yes "] {
            assert!(parse_bool("K", raw).unwrap(), "Value: {}", raw);
        }
        for raw in ["false", "0", "off"] {
            assert!(!parse_bool("K", raw).unwrap(), "Value: {}", raw);
        }
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn test_max_parallel_never_zero() {
        assert_eq!(SearchConfig::new().with_max_parallel(0).max_parallel, 1);
    }
}
