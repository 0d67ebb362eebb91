//! Caller-facing scraping service.
//!
//! [`RecipeScraper`] ties the registry, a browser backend and a store
//! together: resolve the URL, run a session, validate, check the language
//! and persist.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ScraperConfig;
use crate::dispatcher::{SiteRegistry, SiteScraper};
use crate::error::{ConfigError, ScrapeError, ScrapeResult, StoreError};
use crate::heuristics::Language;
use crate::proxy::ProxyPool;
use crate::session::ExtractionSession;
use crate::traits::browser::Browser;
use crate::traits::store::RecipeStore;
use crate::types::recipe::{ExtractedRecipe, ImportedRecipe};
use crate::types::search::{DietaryFilters, SearchCandidate, SupportedSite};

/// Scrapes recipe URLs into a store.
pub struct RecipeScraper<S: RecipeStore + ?Sized> {
    registry: Arc<SiteRegistry>,
    browser: Arc<dyn Browser>,
    store: Arc<S>,
}

impl<S: RecipeStore + ?Sized> Clone for RecipeScraper<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            browser: self.browser.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: RecipeStore + ?Sized> RecipeScraper<S> {
    pub fn new(registry: Arc<SiteRegistry>, browser: Arc<dyn Browser>, store: Arc<S>) -> Self {
        Self {
            registry,
            browser,
            store,
        }
    }

    /// Built-in sites plus a proxy pool read from configuration.
    pub fn from_config(
        config: ScraperConfig,
        browser: Arc<dyn Browser>,
        store: Arc<S>,
    ) -> Result<Self, ConfigError> {
        let pool = ProxyPool::from_config(&config)?;
        let registry = SiteRegistry::with_builtin_sites(config).with_proxy_source(Arc::new(pool));
        Ok(Self::new(Arc::new(registry), browser, store))
    }

    pub fn config(&self) -> &ScraperConfig {
        self.registry.config()
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_supported_sites(&self) -> Vec<SupportedSite> {
        self.registry.list_supported_sites()
    }

    pub fn is_url_supported(&self, url: &str) -> bool {
        self.registry.is_url_supported(url)
    }

    fn resolve(&self, url: &str) -> ScrapeResult<SiteScraper> {
        self.registry
            .resolve(url)
            .ok_or_else(|| ScrapeError::UnsupportedUrl {
                url: url.to_string(),
                supported: self
                    .registry
                    .site_names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
    }

    /// Extract and check a recipe without storing it.
    pub async fn extract(&self, url: &str) -> ScrapeResult<ExtractedRecipe> {
        let scraper = self.resolve(url)?;
        self.extract_with(&scraper, url).await
    }

    /// [`extract`](Self::extract) through an already resolved scraper.
    pub async fn extract_with(&self, scraper: &SiteScraper, url: &str) -> ScrapeResult<ExtractedRecipe> {
        let recipe = ExtractionSession::new(self.browser.as_ref(), self.config())
            .scrape(scraper, url)
            .await?;
        self.accept(recipe)
    }

    /// Scrape a URL and store the recipe.
    ///
    /// Fails with `DuplicateSource` before any navigation when the URL is
    /// already stored, and with `UnsupportedUrl` when no site handles it.
    pub async fn scrape_one(&self, url: &str) -> ScrapeResult<ImportedRecipe> {
        if self.store.exists_by_url(url).await? {
            return Err(ScrapeError::DuplicateSource {
                url: url.to_string(),
            });
        }

        let scraper = self.resolve(url)?;
        self.import_with(&scraper, url).await
    }

    /// Extract through `scraper` and store the result.
    pub async fn import_with(&self, scraper: &SiteScraper, url: &str) -> ScrapeResult<ImportedRecipe> {
        let recipe = self.extract_with(scraper, url).await?;

        let id = match self.store.insert(&recipe).await {
            Ok(id) => id,
            Err(StoreError::Duplicate { url }) => return Err(ScrapeError::DuplicateSource { url }),
            Err(e) => return Err(e.into()),
        };

        info!(
            id,
            url = %url,
            site = %recipe.source_site,
            title = %recipe.title,
            "Recipe imported"
        );
        Ok(ImportedRecipe { id, recipe })
    }

    /// Candidates from one site's search page.
    pub async fn search_site(
        &self,
        scraper: &SiteScraper,
        keyword: Option<&str>,
        filters: &DietaryFilters,
        limit: usize,
    ) -> ScrapeResult<Vec<SearchCandidate>> {
        ExtractionSession::new(self.browser.as_ref(), self.config())
            .search(scraper, keyword, filters, limit)
            .await
    }

    /// Validate completeness, then reject a known language other than the
    /// accepted one. Undetermined language passes.
    fn accept(&self, recipe: ExtractedRecipe) -> ScrapeResult<ExtractedRecipe> {
        let validation = recipe.validate();
        if !validation.valid {
            warn!(url = %recipe.source_url, reason = %validation.reason, "Recipe rejected as incomplete");
            return Err(ScrapeError::InvalidContent {
                reason: validation.reason,
            });
        }

        let detected = recipe.detect_language();
        let accepted = self.config().accepted_language;
        if detected != Language::Unknown && detected != accepted {
            warn!(
                url = %recipe.source_url,
                detected = %detected,
                accepted = %accepted,
                "Recipe rejected for language"
            );
            return Err(ScrapeError::UnsupportedLanguage { detected });
        }

        Ok(recipe)
    }
}
