//! URL-to-strategy dispatch.
//!
//! [`SiteRegistry`] is an owned, ordered list of strategies built once at
//! startup and shared by handle. Resolution is a linear scan where the
//! first matching strategy wins.

use std::sync::Arc;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::sites::builtin_strategies;
use crate::throttle::RequestThrottle;
use crate::traits::proxy::ProxySource;
use crate::traits::strategy::ExtractionStrategy;
use crate::types::search::SupportedSite;

/// A resolved strategy instance, ready for one or more sessions.
///
/// Owns its own throttle: requests made through one `SiteScraper` are
/// spaced by the configured interval, while two instances never wait on
/// each other.
#[derive(Clone)]
pub struct SiteScraper {
    strategy: Arc<dyn ExtractionStrategy>,
    proxy: Option<String>,
    proxy_source: Option<Arc<dyn ProxySource>>,
    throttle: RequestThrottle,
}

impl SiteScraper {
    pub fn new(strategy: Arc<dyn ExtractionStrategy>, throttle: RequestThrottle) -> Self {
        Self {
            strategy,
            proxy: None,
            proxy_source: None,
            throttle,
        }
    }

    /// Route this instance's sessions through `proxy`, reporting failures
    /// back to `source`.
    pub fn with_proxy(mut self, proxy: String, source: Arc<dyn ProxySource>) -> Self {
        self.proxy = Some(proxy);
        self.proxy_source = Some(source);
        self
    }

    pub fn strategy(&self) -> &dyn ExtractionStrategy {
        self.strategy.as_ref()
    }

    pub fn site_name(&self) -> &'static str {
        self.strategy.site_name()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn throttle(&self) -> &RequestThrottle {
        &self.throttle
    }

    /// Exclude the attached proxy from rotation.
    pub fn mark_proxy_failed(&self) {
        if let (Some(proxy), Some(source)) = (&self.proxy, &self.proxy_source) {
            source.mark_failed(proxy);
        }
    }
}

impl std::fmt::Debug for SiteScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteScraper")
            .field("site", &self.site_name())
            .field("proxy", &self.proxy)
            .field("throttle", &self.throttle)
            .finish()
    }
}

/// Registered strategies in registration order.
pub struct SiteRegistry {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    proxy_source: Option<Arc<dyn ProxySource>>,
    config: ScraperConfig,
}

impl SiteRegistry {
    /// An empty registry.
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            strategies: Vec::new(),
            proxy_source: None,
            config,
        }
    }

    /// A registry holding every built-in site adapter.
    pub fn with_builtin_sites(config: ScraperConfig) -> Self {
        let mut registry = Self::new(config);
        for strategy in builtin_strategies() {
            registry.register(strategy);
        }
        registry
    }

    /// Attach a proxy source consulted on every resolve.
    pub fn with_proxy_source(mut self, source: Arc<dyn ProxySource>) -> Self {
        self.proxy_source = Some(source);
        self
    }

    /// Append a strategy. Registering a site name twice is a no-op.
    pub fn register(&mut self, strategy: Arc<dyn ExtractionStrategy>) {
        if self
            .strategies
            .iter()
            .any(|s| s.site_name() == strategy.site_name())
        {
            debug!(site = %strategy.site_name(), "Strategy already registered");
            return;
        }
        self.strategies.push(strategy);
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// The first strategy supporting `url`, as a fresh instance.
    pub fn resolve(&self, url: &str) -> Option<SiteScraper> {
        let strategy = self.strategies.iter().find(|s| s.supports_url(url))?;
        debug!(url = %url, site = %strategy.site_name(), "Resolved strategy");
        Some(self.instantiate(strategy.clone()))
    }

    /// The strategy registered under `name`, as a fresh instance.
    pub fn resolve_by_name(&self, name: &str) -> Option<SiteScraper> {
        self.strategies
            .iter()
            .find(|s| s.site_name() == name)
            .map(|s| self.instantiate(s.clone()))
    }

    fn instantiate(&self, strategy: Arc<dyn ExtractionStrategy>) -> SiteScraper {
        let scraper = SiteScraper::new(
            strategy,
            RequestThrottle::new(self.config.min_request_interval),
        );

        match &self.proxy_source {
            Some(source) => match source.next_proxy() {
                Some(proxy) => scraper.with_proxy(proxy, source.clone()),
                None => scraper,
            },
            None => scraper,
        }
    }

    /// Name and domains of every registered site, in registration order.
    pub fn list_supported_sites(&self) -> Vec<SupportedSite> {
        self.strategies
            .iter()
            .map(|s| SupportedSite {
                name: s.site_name().to_string(),
                domains: s.supported_domains().iter().map(|d| d.to_string()).collect(),
            })
            .collect()
    }

    pub fn is_url_supported(&self, url: &str) -> bool {
        self.strategies.iter().any(|s| s.supports_url(url))
    }

    pub fn site_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.site_name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
