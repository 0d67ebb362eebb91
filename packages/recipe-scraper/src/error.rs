//! Typed errors for the recipe scraper.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::heuristics::Language;

/// Errors surfaced by a single-recipe scrape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No registered strategy handles the URL
    #[error("unsupported URL: {url} (supported sites: {})", supported.join(", "))]
    UnsupportedUrl { url: String, supported: Vec<String> },

    /// A recipe with this source URL is already stored
    #[error("a recipe with this URL already exists: {url}")]
    DuplicateSource { url: String },

    /// The extracted record failed completeness validation
    #[error("recipe has no valid content: {reason}")]
    InvalidContent { reason: String },

    /// The extracted record is not in the accepted language
    #[error("recipe language {detected} is not accepted")]
    UnsupportedLanguage { detected: Language },

    /// Navigating to the page failed
    #[error("navigation failed: {0}")]
    Navigation(#[source] BrowserError),

    /// Reading the loaded page failed
    #[error("extraction failed: {0}")]
    Extraction(#[source] BrowserError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ScrapeError {
    /// Whether this rejection comes from the content itself rather than the
    /// automation layer or storage.
    pub fn is_content_rejection(&self) -> bool {
        matches!(
            self,
            ScrapeError::InvalidContent { .. } | ScrapeError::UnsupportedLanguage { .. }
        )
    }
}

/// Errors raised by a browser automation backend.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The browser or browsing context could not be started
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Page navigation failed
    #[error("failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    /// A wait exceeded its time budget
    #[error("timed out waiting for {what}")]
    Timeout { what: String },

    /// The backend does not provide this capability
    #[error("not supported by this browser backend: {0}")]
    Unsupported(&'static str),

    /// In-page script evaluation failed
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A DOM read was attempted before any navigation
    #[error("no page loaded")]
    NotLoaded,
}

impl BrowserError {
    /// Whether this error is a soft-wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

/// Errors raised by a recipe store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-URL constraint violated
    #[error("duplicate source URL: {url}")]
    Duplicate { url: String },

    /// Backend failure
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of one site inside a bulk search. Recorded on the job, never
/// propagated out of the coordinator.
#[derive(Debug, Error)]
pub enum SiteError {
    /// No strategy registered under this site name
    #[error("no scraper registered for site {site}")]
    StrategyNotFound { site: String },

    /// Loading the search-results page failed
    #[error("{0}")]
    Search(#[from] ScrapeError),

    /// Duplicate check against the store failed
    #[error("{0}")]
    Storage(#[from] StoreError),
}

/// Errors raised by bulk-search job queries.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Unknown job id
    #[error("search job not found: {id}")]
    JobNotFound { id: String },

    /// Requested limit outside `1..=max`
    #[error("invalid result limit {limit} (expected 1..={max})")]
    InvalidLimit { limit: usize, max: usize },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    /// The proxy list file could not be read
    #[error("failed to read proxy list {path}: {source}")]
    ProxyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for browser operations.
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for bulk-search queries.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
