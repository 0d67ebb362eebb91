//! allrecipes.com

use super::{search_terms, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.article-heading", "h1.headline", "h1"],
    description: &[
        ".article-subheading",
        ".recipe-summary p",
        ".article-body p:first-of-type",
    ],
    image: &[".primary-image img", ".recipe-image img", "article img"],
    image_attributes: &["src", "data-src"],
    ingredients: &[
        ".mntl-structured-ingredients__list-item",
        ".ingredients-item-name",
        ".recipe-ingredients li",
        "[class*=\"ingredient\"] li",
    ],
    steps: &[
        ".mntl-sc-block-group--LI p",
        ".instructions-section-item .paragraph",
        ".recipe-directions__list li",
        "[class*=\"directions\"] li",
    ],
    prep_time: &[
        ".recipe-prep-time .meta-value",
        "[class*=\"prep-time\"] .mntl-recipe-details__value",
    ],
    cook_time: &[
        ".recipe-cook-time .meta-value",
        "[class*=\"cook-time\"] .mntl-recipe-details__value",
    ],
    servings: &[
        ".recipe-servings .meta-value",
        "[class*=\"servings\"] .mntl-recipe-details__value",
    ],
};

/// AllRecipes (English).
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRecipes;

impl ExtractionStrategy for AllRecipes {
    fn site_name(&self) -> &'static str {
        "AllRecipes"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["allrecipes.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, filters: &DietaryFilters) -> String {
        match search_terms(keyword, filters, ("gluten free", "vegetarian", "vegan")) {
            Some(terms) => format!("https://www.allrecipes.com/search?q={}", encode_query(&terms)),
            None => "https://www.allrecipes.com/recipes/".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[
            "a.mntl-card-list-items[href*=\"/recipe/\"]",
            ".card__content a[href*=\"/recipe/\"]",
            "a[href*=\"/recipe/\"]",
        ]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }
}
