//! cocinerosargentinos.com

use super::SiteSelectors;
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.recipe-title", "h1.entry-title", "h1"],
    description: &[".recipe-description", ".entry-content > p:first-of-type"],
    image: &[".recipe-image img", ".featured-image img", "article img"],
    prep_time: &[".prep-time", "[class*=\"tiempo-prep\"]"],
    cook_time: &[".cook-time", "[class*=\"tiempo-coccion\"]"],
    servings: &[".servings", "[class*=\"porciones\"]"],
    ingredients: &[
        ".recipe-ingredients li",
        "[class*=\"ingredientes\"] li",
        ".ingredients-list li",
        "ul.ingredients li",
    ],
    steps: &[
        ".recipe-directions li",
        "[class*=\"preparacion\"] li",
        ".recipe-steps li",
        "ol.directions li",
    ],
    ..SiteSelectors::EMPTY
};

/// Cocineros Argentinos, TV cooking show site.
#[derive(Debug, Clone, Copy, Default)]
pub struct CocinerosArgentinos;

impl ExtractionStrategy for CocinerosArgentinos {
    fn site_name(&self) -> &'static str {
        "Cocineros Argentinos"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["cocinerosargentinos.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://cocinerosargentinos.com/buscar?q={}",
                encode_query(keyword)
            ),
            None => "https://cocinerosargentinos.com/recetas".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &[".recipe-card a", "article a", "a[href*=\"/receta\"]"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        SELECTORS.extract(page, url, self.site_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_recipe() {
        let url = "https://cocinerosargentinos.com/receta/locro";
        let page = PageSnapshot::parse(
            url,
            r#"<h1 class="recipe-title">Locro criollo</h1>
               <p class="recipe-description">Para el 25 de mayo.</p>
               <span class="cook-time">3 horas</span>
               <span class="cantidad-porciones">8 porciones</span>
               <div class="recipe-ingredients"><ul><li>500 g de maíz blanco</li><li>250 g de porotos</li></ul></div>
               <div class="recipe-directions"><ol><li>Remojar el maíz.</li><li>Cocinar a fuego lento.</li></ol></div>"#,
        );
        let recipe = CocinerosArgentinos.extract_recipe(&page, url);

        assert_eq!(recipe.title, "Locro criollo");
        assert_eq!(recipe.description.as_deref(), Some("Para el 25 de mayo."));
        assert_eq!(recipe.cook_time.as_deref(), Some("3 horas"));
        assert_eq!(recipe.servings.as_deref(), Some("8 porciones"));
        assert_eq!(recipe.ingredients, vec!["500 g de maíz blanco", "250 g de porotos"]);
        assert_eq!(recipe.steps, vec!["Remojar el maíz.", "Cocinar a fuego lento."]);
        assert!(recipe.prep_time.is_none());
    }
}
