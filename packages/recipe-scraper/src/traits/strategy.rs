//! Per-site extraction strategy.

use std::time::Duration;
use url::form_urlencoded;

use crate::dom::PageSnapshot;
use crate::types::{
    recipe::ExtractedRecipe,
    search::{DietaryFilters, SearchCandidate},
};

/// Search-result link selectors used when a site declares none.
const DEFAULT_RESULT_SELECTORS: &[&str] = &[
    "article a",
    ".entry-title a",
    "a[href*=\"receta\"]",
    "a[href*=\"recipe\"]",
];

/// Incremental scrolling used to trigger lazily loaded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LazyScroll {
    /// Number of scroll-and-wait cycles.
    pub steps: u32,

    /// Pixels scrolled per cycle.
    pub distance: i64,

    /// Pause after each cycle.
    pub delay: Duration,
}

/// Percent-encode a search keyword for a query string.
pub fn encode_query(keyword: &str) -> String {
    form_urlencoded::byte_serialize(keyword.trim().as_bytes()).collect()
}

/// Site-specific extraction.
///
/// Implementations are pure functions of an already loaded page: the
/// session handles navigation, waits and teardown. Extraction never fails
/// on a missing field; it returns an empty value and lets validation decide.
pub trait ExtractionStrategy: Send + Sync {
    /// Display name, also the key used by bulk search.
    fn site_name(&self) -> &'static str;

    /// Domains this strategy handles.
    fn supported_domains(&self) -> &'static [&'static str];

    /// True if any supported domain occurs in the lowercased URL.
    ///
    /// Loose on purpose so subdomains and locale prefixes match.
    fn supports_url(&self, url: &str) -> bool {
        let url_lower = url.to_lowercase();
        self.supported_domains()
            .iter()
            .any(|domain| url_lower.contains(domain))
    }

    /// URL of the site's search page for a keyword, or its recipe index
    /// when there is none.
    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        let domain = self.supported_domains().first().copied().unwrap_or_default();
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!("https://{}/search?q={}", domain, encode_query(keyword)),
            None => format!("https://{}/", domain),
        }
    }

    /// Link selectors for search-results pages, tried in order.
    fn search_result_selectors(&self) -> &'static [&'static str] {
        DEFAULT_RESULT_SELECTORS
    }

    /// Candidates from a loaded search-results page.
    ///
    /// The first selector yielding any link wins. Never fails: a page with
    /// no recognisable results yields an empty list.
    fn extract_search_results(&self, page: &PageSnapshot, limit: usize) -> Vec<SearchCandidate> {
        page.select_links(self.search_result_selectors(), limit)
    }

    /// Extract a recipe from a loaded page.
    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe;

    /// Selectors signalling that dynamic content has rendered.
    fn ready_selectors(&self) -> &'static [&'static str] {
        &[]
    }

    /// Scrolling needed before the page content is complete.
    fn lazy_scroll(&self) -> Option<LazyScroll> {
        None
    }
}
