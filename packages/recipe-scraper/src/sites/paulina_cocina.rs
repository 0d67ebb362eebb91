//! paulinacocina.net

use super::{apply_content_fallbacks, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.entry-title", "h1.post-title", "h1"],
    description: &[".entry-content > p:first-of-type", ".recipe-summary"],
    image: &[".wp-post-image", ".entry-content img", "article img"],
    prep_time: &[
        ".wprm-recipe-prep-time-container",
        "[class*=\"prep-time\"]",
    ],
    cook_time: &[
        ".wprm-recipe-cook-time-container",
        "[class*=\"cook-time\"]",
    ],
    servings: &[".wprm-recipe-servings-container", "[class*=\"servings\"]"],
    ingredients: &[
        ".wprm-recipe-ingredient",
        ".recipe-ingredients li",
        "[class*=\"ingredientes\"] li",
        ".ingredients li",
    ],
    steps: &[
        ".wprm-recipe-instruction-text",
        ".recipe-instructions li",
        "[class*=\"preparacion\"] li",
        ".instructions li",
    ],
    ..SiteSelectors::EMPTY
};

/// Paulina Cocina, Argentine WordPress recipe blog.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaulinaCocina;

impl ExtractionStrategy for PaulinaCocina {
    fn site_name(&self) -> &'static str {
        "Paulina Cocina"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["paulinacocina.net"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!("https://www.paulinacocina.net/?s={}", encode_query(keyword)),
            None => "https://www.paulinacocina.net/recetas".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[".entry-title a", "article a", "a[href*=\"paulinacocina.net/\"]"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        let mut recipe = SELECTORS.extract(page, url, self.site_name());
        apply_content_fallbacks(page, &mut recipe);
        recipe
    }

    fn ready_selectors(&self) -> &'static [&'static str] {
        &[".wprm-recipe-container", ".entry-content"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wprm_markup() {
        let url = "https://www.paulinacocina.net/chipa/1234";
        let page = PageSnapshot::parse(
            url,
            r#"<h1 class="entry-title">Chipá</h1>
               <img class="wp-post-image" src="https://www.paulinacocina.net/chipa.jpg">
               <div class="wprm-recipe-container">
                 <div class="wprm-recipe-prep-time-container">15 minutos</div>
                 <div class="wprm-recipe-servings-container">20 chipás</div>
                 <ul><li class="wprm-recipe-ingredient">500 g de almidón de mandioca</li>
                     <li class="wprm-recipe-ingredient">250 g de queso</li></ul>
                 <ul><li><div class="wprm-recipe-instruction-text">Mezclar los secos.</div></li>
                     <li><div class="wprm-recipe-instruction-text">Hornear 20 minutos.</div></li></ul>
               </div>"#,
        );
        let recipe = PaulinaCocina.extract_recipe(&page, url);

        assert_eq!(recipe.title, "Chipá");
        assert_eq!(recipe.image_url.as_deref(), Some("https://www.paulinacocina.net/chipa.jpg"));
        assert_eq!(recipe.prep_time.as_deref(), Some("15 minutos"));
        assert_eq!(recipe.servings.as_deref(), Some("20 chipás"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.steps, vec!["Mezclar los secos.", "Hornear 20 minutos."]);
    }
}
