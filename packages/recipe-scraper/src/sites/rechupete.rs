//! recetasderechupete.com

use super::{apply_content_fallbacks, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.entry-title", "h1.post-title", "h1"],
    description: &[".entry-content > p:first-of-type", ".recipe-summary"],
    image: &[".entry-content img", ".post-thumbnail img", "article img"],
    prep_time: &[".recipe-prep-time", "[class*=\"tiempo-prep\"]"],
    cook_time: &[".recipe-cook-time", "[class*=\"tiempo-coccion\"]"],
    servings: &[".recipe-servings", "[class*=\"raciones\"]"],
    ingredients: &[
        ".wprm-recipe-ingredient",
        ".recipe-ingredients li",
        "[class*=\"ingredientes\"] li",
        ".ingredients li",
    ],
    steps: &[
        ".wprm-recipe-instruction",
        ".recipe-instructions li",
        "[class*=\"elaboracion\"] li",
        ".instructions li",
    ],
    ..SiteSelectors::EMPTY
};

/// Recetas de Rechupete, WordPress recipe blog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rechupete;

impl ExtractionStrategy for Rechupete {
    fn site_name(&self) -> &'static str {
        "Recetas de Rechupete"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["recetasderechupete.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://www.recetasderechupete.com/?s={}",
                encode_query(keyword)
            ),
            None => "https://www.recetasderechupete.com/".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &["article .entry-title a", ".entry-title a", "article a"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        let mut recipe = SELECTORS.extract(page, url, self.site_name());
        apply_content_fallbacks(page, &mut recipe);
        recipe
    }
}
