//! hellofresh.com, hellofresh.es, hellofresh.com.ar

use super::SiteSelectors;
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1[data-test-id=\"recipeDetailFragment.recipe-name\"]", "h1"],
    description: &[
        "[data-test-id=\"recipeDetailFragment.recipe-description\"]",
        ".recipe-description",
    ],
    image: &[
        "[data-test-id=\"recipeDetailFragment.recipe-image\"] img",
        ".recipe-header img",
    ],
    cook_time: &[
        "[data-test-id=\"recipeDetailFragment.cooking-time\"]",
        ".cooking-time",
    ],
    servings: &[
        "[data-test-id=\"recipeDetailFragment.servings\"]",
        ".servings",
    ],
    prep_time: &[
        "[data-test-id=\"recipeDetailFragment.preparation-time\"]",
        ".prep-time",
    ],
    ingredients: &[
        "[data-test-id=\"recipeDetailFragment.ingredient-item\"]",
        ".recipe-ingredients li",
        "[class*=\"ingredient\"] li",
        ".ingredients-list li",
    ],
    steps: &[
        "[data-test-id=\"recipeDetailFragment.instructions.step\"]",
        ".recipe-steps li",
        "[class*=\"instruction\"] li",
        ".instructions li",
    ],
    ..SiteSelectors::EMPTY
};

/// HelloFresh meal-kit recipes, all locales.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloFresh;

impl ExtractionStrategy for HelloFresh {
    fn site_name(&self) -> &'static str {
        "HelloFresh"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["hellofresh.com", "hellofresh.es", "hellofresh.com.ar"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://www.hellofresh.es/recipes/search?q={}",
                encode_query(keyword)
            ),
            None => "https://www.hellofresh.es/recipes".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[
            "[data-test-id=\"recipe-image-card\"] a",
            "a[href*=\"/recipes/\"]",
        ]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }

    fn ready_selectors(&self) -> &'static [&'static str] {
        &["[data-test-id=\"recipeDetailFragment.ingredient-item\"]"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_test_id_markup() {
        let url = "https://www.hellofresh.es/recipes/pollo-al-curry-123";
        let page = PageSnapshot::parse(
            url,
            r#"<h1 data-test-id="recipeDetailFragment.recipe-name">Pollo al curry</h1>
               <div data-test-id="recipeDetailFragment.recipe-description"><p>Suave y cremoso.</p></div>
               <div data-test-id="recipeDetailFragment.recipe-image"><img src="https://img.hellofresh.com/c.jpg"></div>
               <span data-test-id="recipeDetailFragment.cooking-time">30 min</span>
               <div data-test-id="recipeDetailFragment.ingredient-item">250 g de pollo</div>
               <div data-test-id="recipeDetailFragment.ingredient-item">1 cebolla</div>
               <div data-test-id="recipeDetailFragment.instructions.step">Cortar el pollo.</div>
               <div data-test-id="recipeDetailFragment.instructions.step">Dorar con curry.</div>"#,
        );
        let recipe = HelloFresh.extract_recipe(&page, url);

        assert_eq!(recipe.title, "Pollo al curry");
        assert_eq!(recipe.description.as_deref(), Some("Suave y cremoso."));
        assert_eq!(recipe.image_url.as_deref(), Some("https://img.hellofresh.com/c.jpg"));
        assert_eq!(recipe.cook_time.as_deref(), Some("30 min"));
        assert_eq!(recipe.ingredients, vec!["250 g de pollo", "1 cebolla"]);
        assert_eq!(recipe.steps, vec!["Cortar el pollo.", "Dorar con curry."]);
    }

    #[test]
    fn test_all_locales_supported() {
        for url in [
            "https://www.hellofresh.com/recipes/x",
            "https://www.hellofresh.es/recipes/x",
            "https://www.hellofresh.com.ar/recipes/x",
        ] {
            assert!(HelloFresh.supports_url(url), "URL: {}", url);
        }
    }
}
