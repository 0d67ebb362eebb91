//! recetasessen.com.ar

use std::time::Duration;

use super::{apply_content_fallbacks, SiteSelectors};
use crate::dom::PageSnapshot;
use crate::traits::strategy::{encode_query, ExtractionStrategy, LazyScroll};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.recipe-title", "h1.entry-title", "h1.post-title", "h1"],
    description: &[
        ".recipe-description",
        ".recipe-summary",
        ".entry-content > p:first-of-type",
    ],
    image: &[
        ".recipe-image img",
        ".wp-post-image",
        ".entry-content img",
        "article img",
        ".post-thumbnail img",
        ".featured-image img",
    ],
    image_attributes: &["src", "data-src", "data-lazy-src", "data-original", "data-lazy"],
    ingredients: &[
        ".recipe-ingredients li",
        ".ingredients-list li",
        "[class*=\"ingredientes\"] li",
        ".ingredients li",
        "ul.ingredientes li",
        ".wprm-recipe-ingredient",
        ".recipe-content .ingredients li",
        "section.ingredientes li",
    ],
    steps: &[
        ".recipe-instructions li",
        ".recipe-directions li",
        "[class*=\"preparacion\"] li",
        "[class*=\"instrucciones\"] li",
        ".instructions li",
        "ol.pasos li",
        ".wprm-recipe-instruction",
        ".wprm-recipe-instruction-text",
        ".recipe-content .steps li",
        "section.preparacion li",
    ],
    prep_time: &[
        ".prep-time",
        ".recipe-prep-time",
        "[class*=\"tiempo-prep\"]",
        ".cooking-time",
    ],
    cook_time: &[".cook-time", ".recipe-cook-time", "[class*=\"tiempo-coccion\"]"],
    servings: &[
        ".servings",
        ".recipe-servings",
        "[class*=\"porciones\"]",
        "[class*=\"rinde\"]",
    ],
};

/// Recetas Essen, cookware brand recipe site (WordPress, lazy images).
#[derive(Debug, Clone, Copy, Default)]
pub struct RecetasEssen;

impl ExtractionStrategy for RecetasEssen {
    fn site_name(&self) -> &'static str {
        "Recetas Essen"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["recetasessen.com.ar", "recetasessen.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://www.recetasessen.com.ar/?s={}",
                encode_query(keyword)
            ),
            None => "https://www.recetasessen.com.ar/recetas/".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &["article a", ".entry-title a", "a[href*=\"receta\"]"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        let mut recipe = SELECTORS.extract(page, url, self.site_name());
        apply_content_fallbacks(page, &mut recipe);
        recipe
    }

    fn ready_selectors(&self) -> &'static [&'static str] {
        &[".entry-content", ".recipe-content", "article"]
    }

    fn lazy_scroll(&self) -> Option<LazyScroll> {
        Some(LazyScroll {
            steps: 5,
            distance: 800,
            delay: Duration::from_millis(500),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_discovery_and_lazy_image() {
        let url = "https://www.recetasessen.com.ar/recetas/bondiola-braseada/";
        let page = PageSnapshot::parse(
            url,
            r#"<article>
                 <h1 class="entry-title">Bondiola braseada</h1>
                 <div class="entry-content">
                   <img src="data:image/gif;base64,R0lGOD" data-lazy="/wp-content/uploads/bondiola.jpg">
                   <div><h3>Ingredientes</h3></div>
                   <div><p>1 bondiola de 1,5 kg<br>2 cebollas<br>500 ml de vino blanco</p></div>
                   <h3>Preparación</h3>
                   <p>Dorar la bondiola en la Essen.</p>
                   <span class="rinde-porciones">Rinde 6 porciones</span>
                 </div>
               </article>"#,
        );
        let recipe = RecetasEssen.extract_recipe(&page, url);

        assert_eq!(recipe.title, "Bondiola braseada");
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://www.recetasessen.com.ar/wp-content/uploads/bondiola.jpg")
        );
        assert_eq!(
            recipe.ingredients,
            vec!["1 bondiola de 1,5 kg", "2 cebollas", "500 ml de vino blanco"]
        );
        assert_eq!(recipe.steps, vec!["Dorar la bondiola en la Essen."]);
        assert_eq!(recipe.servings.as_deref(), Some("Rinde 6 porciones"));
    }

    #[test]
    fn test_scrolls_for_lazy_content() {
        let scroll = RecetasEssen.lazy_scroll().unwrap();
        assert_eq!(scroll.steps, 5);
        assert_eq!(scroll.delay, Duration::from_millis(500));
    }

    #[test]
    fn test_both_domains_supported() {
        assert!(RecetasEssen.supports_url("https://www.recetasessen.com.ar/recetas/x"));
        assert!(RecetasEssen.supports_url("https://recetasessen.com/x"));
    }
}
