//! tasty.co

use super::{search_terms, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1[class*=\"recipe-name\"]", "h1.recipe-title", "h1"],
    description: &["[class*=\"recipe-description\"]", ".recipe-description"],
    image: &[
        ".recipe-photo img",
        "picture img",
        "[class*=\"recipe-image\"] img",
    ],
    ingredients: &[
        "[class*=\"ingredient-list\"] li",
        ".ingredient-list li",
        "[class*=\"ingredients\"] li",
        ".ingredients li",
    ],
    steps: &[
        "[class*=\"preparation-list\"] li",
        ".preparation-list li",
        "[class*=\"instructions\"] li",
        ".instructions li",
    ],
    servings: &["[class*=\"servings\"]", ".servings-display"],
    cook_time: &["[class*=\"cook-time\"]", ".total-time"],
    ..SiteSelectors::EMPTY
};

/// Tasty (English).
#[derive(Debug, Clone, Copy, Default)]
pub struct Tasty;

impl ExtractionStrategy for Tasty {
    fn site_name(&self) -> &'static str {
        "Tasty"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["tasty.co"]
    }

    fn build_search_url(&self, keyword: Option<&str>, filters: &DietaryFilters) -> String {
        match search_terms(keyword, filters, ("gluten free", "vegetarian", "vegan")) {
            Some(terms) => format!("https://tasty.co/search?q={}", encode_query(&terms)),
            None => "https://tasty.co/latest".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[
            ".feed-item a[href*=\"/recipe/\"]",
            "a[href*=\"/recipe/\"]",
        ]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }

    fn ready_selectors(&self) -> &'static [&'static str] {
        &["[class*=\"ingredients\"]", "[class*=\"preparation\"]"]
    }
}
