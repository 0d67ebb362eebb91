//! Built-in site adapters.
//!
//! Each adapter declares its fallback chains as a [`SiteSelectors`] profile
//! and adds site-specific search URLs, result selectors and heading-based
//! discovery where the markup has no stable classes.

use std::sync::Arc;

use crate::dom::{PageSnapshot, IMAGE_ATTRIBUTES};
use crate::heuristics::separate_ingredients_and_steps;
use crate::traits::strategy::ExtractionStrategy;
use crate::types::recipe::{ExtractedRecipe, UNTITLED};
use crate::types::search::DietaryFilters;

pub mod allrecipes;
pub mod cocineros_argentinos;
pub mod cookpad;
pub mod directo_al_paladar;
pub mod hellofresh;
pub mod paulina_cocina;
pub mod recetas_essen;
pub mod rechupete;
pub mod soy_celiaco;
pub mod tasty;

pub use allrecipes::AllRecipes;
pub use cocineros_argentinos::CocinerosArgentinos;
pub use cookpad::Cookpad;
pub use directo_al_paladar::DirectoAlPaladar;
pub use hellofresh::HelloFresh;
pub use paulina_cocina::PaulinaCocina;
pub use recetas_essen::RecetasEssen;
pub use rechupete::Rechupete;
pub use soy_celiaco::SoyCeliaco;
pub use tasty::Tasty;

/// Heading elements searched by heading-based discovery.
pub const HEADING_SELECTORS: &[&str] = &["h2", "h3", "h4", "h5", "strong", ".section-title"];

/// Heading keywords that introduce an ingredient list.
pub const INGREDIENT_HEADINGS: &[&str] = &["ingredientes", "ingredients", "lista de ingredientes"];

/// Heading keywords that introduce the preparation steps.
pub const STEP_HEADINGS: &[&str] = &[
    "preparación",
    "preparacion",
    "modo de preparación",
    "modo de preparacion",
    "instrucciones",
    "elaboración",
    "elaboracion",
    "pasos",
    "procedimiento",
];

/// Flat content lists classified when a page has no separate sections.
const CONTENT_LIST_SELECTORS: &[&str] = &[".entry-content li", "article li", ".entry-content p"];

/// Ordered selector chains for every recipe field of one site.
#[derive(Debug, Clone, Copy)]
pub struct SiteSelectors {
    pub title: &'static [&'static str],
    pub description: &'static [&'static str],
    pub image: &'static [&'static str],
    pub image_attributes: &'static [&'static str],
    pub ingredients: &'static [&'static str],
    pub steps: &'static [&'static str],
    pub prep_time: &'static [&'static str],
    pub cook_time: &'static [&'static str],
    pub servings: &'static [&'static str],
}

impl SiteSelectors {
    /// A profile with no chains; sites override the fields they know.
    pub const EMPTY: SiteSelectors = SiteSelectors {
        title: &["h1"],
        description: &[],
        image: &[],
        image_attributes: IMAGE_ATTRIBUTES,
        ingredients: &[],
        steps: &[],
        prep_time: &[],
        cook_time: &[],
        servings: &[],
    };

    /// Run every chain against a page.
    pub fn extract(&self, page: &PageSnapshot, url: &str, site: &str) -> ExtractedRecipe {
        let mut recipe = ExtractedRecipe::new(
            page.select_first_text(self.title)
                .unwrap_or_else(|| UNTITLED.to_string()),
            url,
            site,
        );

        recipe.description = page.select_first_text(self.description);
        recipe.image_url = page.select_url_attr(self.image, self.image_attributes);
        recipe.ingredients = page.select_texts(self.ingredients);
        recipe.steps = page.select_texts(self.steps);
        recipe.prep_time = page.select_first_text(self.prep_time);
        recipe.cook_time = page.select_first_text(self.cook_time);
        recipe.servings = page.select_first_text(self.servings);

        recipe
    }
}

/// Fill empty ingredient/step lists from headings, then from a classified
/// flat content list.
pub fn apply_content_fallbacks(page: &PageSnapshot, recipe: &mut ExtractedRecipe) {
    if recipe.ingredients.is_empty() {
        recipe.ingredients = page.items_after_heading(HEADING_SELECTORS, INGREDIENT_HEADINGS);
    }
    if recipe.steps.is_empty() {
        recipe.steps = page.items_after_heading(HEADING_SELECTORS, STEP_HEADINGS);
    }

    if recipe.ingredients.is_empty() && recipe.steps.is_empty() {
        let (ingredients, steps) = separate_ingredients_and_steps(page.select_texts(CONTENT_LIST_SELECTORS));
        recipe.ingredients = ingredients;
        recipe.steps = steps;
    }
}

/// Keyword plus the site's words for the active dietary filters, or `None`
/// when both are empty.
pub fn search_terms(
    keyword: Option<&str>,
    filters: &DietaryFilters,
    words: (&str, &str, &str),
) -> Option<String> {
    let mut terms: Vec<&str> = keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .into_iter()
        .collect();
    terms.extend(filters.terms(words.0, words.1, words.2));

    (!terms.is_empty()).then(|| terms.join(" "))
}

/// Every built-in adapter, in registration order.
pub fn builtin_strategies() -> Vec<Arc<dyn ExtractionStrategy>> {
    vec![
        Arc::new(Cookpad),
        Arc::new(DirectoAlPaladar),
        Arc::new(Rechupete),
        Arc::new(AllRecipes),
        Arc::new(Tasty),
        Arc::new(PaulinaCocina),
        Arc::new(SoyCeliaco),
        Arc::new(HelloFresh),
        Arc::new(CocinerosArgentinos),
        Arc::new(RecetasEssen),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_names_unique() {
        let strategies = builtin_strategies();
        let names: HashSet<_> = strategies.iter().map(|s| s.site_name()).collect();
        assert_eq!(strategies.len(), 10);
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_domains_do_not_overlap() {
        let strategies = builtin_strategies();
        for strategy in &strategies {
            for domain in strategy.supported_domains() {
                let owners: Vec<_> = strategies
                    .iter()
                    .filter(|s| s.supports_url(&format!("https://{}/x", domain)))
                    .map(|s| s.site_name())
                    .collect();
                assert_eq!(owners, vec![strategy.site_name()], "Domain: {}", domain);
            }
        }
    }

    #[test]
    fn test_search_terms() {
        let words = ("sin gluten", "vegetariana", "vegana");
        let vegan = DietaryFilters::new().with_vegan(true);
        assert_eq!(
            search_terms(Some("tarta"), &vegan, words).as_deref(),
            Some("tarta vegana")
        );
        assert_eq!(search_terms(None, &vegan, words).as_deref(), Some("vegana"));
        assert_eq!(search_terms(Some(" "), &DietaryFilters::default(), words), None);
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let page = PageSnapshot::parse("https://x.example/", "<p>nada</p>");
        let recipe = SiteSelectors::EMPTY.extract(&page, "https://x.example/", "X");
        assert_eq!(recipe.title, UNTITLED);
        assert!(recipe.description.is_none());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_classified_fallback() {
        let page = PageSnapshot::parse(
            "https://x.example/",
            r#"<div class="entry-content"><ul>
                 <li>250 g de harina</li>
                 <li>Mezclar todo y hornear</li>
               </ul></div>"#,
        );
        let mut recipe = ExtractedRecipe::new("X", "https://x.example/", "X");
        apply_content_fallbacks(&page, &mut recipe);
        assert_eq!(recipe.ingredients, vec!["250 g de harina"]);
        assert_eq!(recipe.steps, vec!["Mezclar todo y hornear"]);
    }
}
