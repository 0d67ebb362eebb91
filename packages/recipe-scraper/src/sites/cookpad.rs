//! cookpad.com

use super::{search_terms, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1[class*=\"recipe-title\"]", "h1.break-words", "h1"],
    description: &["[class*=\"recipe-story\"]", ".mb-sm"],
    image: &[
        "picture img",
        "img[class*=\"recipe-image\"]",
        ".recipe-main-photo img",
    ],
    ingredients: &[
        "#ingredients .ingredient",
        "[class*=\"ingredient-list\"] li",
        ".ingredient-list li",
        "#ingredients li",
    ],
    steps: &[
        "#steps .step",
        "[class*=\"step-text\"]",
        ".step-text",
        "#steps li",
    ],
    servings: &["[class*=\"serving\"]", ".servings"],
    cook_time: &["[class*=\"cooking-time\"]", ".cooking-time"],
    ..SiteSelectors::EMPTY
};

/// Cookpad, Spanish-language community recipes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cookpad;

impl ExtractionStrategy for Cookpad {
    fn site_name(&self) -> &'static str {
        "Cookpad"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["cookpad.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, filters: &DietaryFilters) -> String {
        match search_terms(keyword, filters, ("sin gluten", "vegetariana", "vegana")) {
            Some(terms) => format!("https://cookpad.com/ar/buscar/{}", encode_query(&terms)),
            None => "https://cookpad.com/ar/recetas".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[
            "li[id^=\"recipe_\"] a[href*=\"/recetas/\"]",
            "a.block-link__main",
            "a[href*=\"/recetas/\"]",
        ]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }

    fn ready_selectors(&self) -> &'static [&'static str] {
        &["#ingredients", "#steps"]
    }
}
