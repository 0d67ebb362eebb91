//! directoalpaladar.com

use super::SiteSelectors;
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.title", "h1.article-title", "h1"],
    description: &[".article-content p:first-of-type", ".recipe-intro"],
    image: &[".article-image img", ".featured-image img", "article img"],
    prep_time: &[".recipe-prep-time", "[class*=\"prep-time\"]"],
    cook_time: &[".recipe-cook-time", "[class*=\"cook-time\"]"],
    servings: &[
        ".recipe-servings",
        "[class*=\"servings\"]",
        "[class*=\"comensales\"]",
    ],
    ingredients: &[
        ".recipe-ingredients li",
        "[class*=\"ingredientes\"] li",
        ".ingredients-list li",
        "ul.ingredients li",
    ],
    steps: &[
        ".recipe-directions li",
        "[class*=\"elaboracion\"] li",
        ".recipe-steps li",
        "ol.directions li",
    ],
    ..SiteSelectors::EMPTY
};

/// Directo al Paladar, Spanish food magazine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoAlPaladar;

impl ExtractionStrategy for DirectoAlPaladar {
    fn site_name(&self) -> &'static str {
        "Directo al Paladar"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["directoalpaladar.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://www.directoalpaladar.com/buscar?q={}",
                encode_query(keyword)
            ),
            None => "https://www.directoalpaladar.com/recetas-de-cocina".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[".abstract-title a", "article h2 a", "article a"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }
}
