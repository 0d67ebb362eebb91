//! Multi-Site Recipe Extraction Library
//!
//! Scrapes recipes from cooking websites into one canonical record,
//! deduplicated by source URL, checked for completeness and filtered by
//! language.
//!
//! # Design
//!
//! - One [`ExtractionStrategy`] per site, each with ordered fallback
//!   selector chains per field
//! - A [`SiteRegistry`] dispatches URLs to strategies, first match wins
//! - An [`ExtractionSession`] drives the browser: throttle, navigate,
//!   settle, extract, always close
//! - Site-agnostic [`heuristics`] run after extraction
//! - A [`SearchCoordinator`] fans keyword searches out over many sites,
//!   concurrently for small jobs and sequentially for large ones
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recipe_scraper::{HttpBrowser, MemoryRecipeStore, RecipeScraper, ScraperConfig};
//!
//! let config = ScraperConfig::from_env()?;
//! let scraper = RecipeScraper::from_config(
//!     config,
//!     Arc::new(HttpBrowser::new()),
//!     Arc::new(MemoryRecipeStore::new()),
//! )?;
//!
//! let imported = scraper.scrape_one("https://cookpad.com/ar/recetas/123").await?;
//! println!("{} ({} ingredients)", imported.recipe.title, imported.recipe.ingredients.len());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams: strategy, browser, store, proxy source
//! - [`sites`] - Built-in site adapters
//! - [`dispatcher`] - URL-to-strategy resolution
//! - [`session`] - Single-page extraction state machine
//! - [`service`] - Caller-facing scrape operations
//! - [`search`] - Bulk multi-site search jobs
//! - [`browsers`] - Browser backends (HTTP, headless Chrome)
//! - [`stores`] - Recipe stores (memory, SQLite)
//! - [`testing`] - Mock browser and HTML fixtures for tests

pub mod browsers;
pub mod config;
pub mod dispatcher;
pub mod dom;
pub mod error;
pub mod heuristics;
pub mod proxy;
pub mod search;
pub mod service;
pub mod session;
pub mod sites;
pub mod stores;
pub mod testing;
pub mod throttle;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::{ScraperConfig, SearchConfig, Viewport};
pub use dispatcher::{SiteRegistry, SiteScraper};
pub use dom::PageSnapshot;
pub use error::{
    BrowserError, BrowserResult, ConfigError, ScrapeError, ScrapeResult, SearchError,
    SearchResult, SiteError, StoreError, StoreResult,
};
pub use heuristics::{
    detect_language, separate_ingredients_and_steps, validate_recipe, Language, RecipeValidation,
};
pub use proxy::ProxyPool;
pub use search::{
    ExecutionMode, JobReport, JobState, SearchCoordinator, SearchJob, SearchRequest, SiteProgress,
    SiteSelection, SiteState,
};
pub use service::RecipeScraper;
pub use session::{ExtractionSession, SessionPhase};
pub use throttle::RequestThrottle;
pub use traits::{
    browser::{Browser, BrowserPage, PageOptions},
    proxy::ProxySource,
    store::RecipeStore,
    strategy::{ExtractionStrategy, LazyScroll},
};
pub use types::{
    recipe::{ExtractedRecipe, ImportedRecipe, RecipeId},
    search::{DietaryFilters, SearchCandidate, SupportedSite},
};

// Re-export backends
pub use browsers::HttpBrowser;

#[cfg(feature = "chrome")]
pub use browsers::ChromeBrowser;

pub use stores::MemoryRecipeStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteRecipeStore;
