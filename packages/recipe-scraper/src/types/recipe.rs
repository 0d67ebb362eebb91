//! Recipe records produced by site adapters.

use serde::{Deserialize, Serialize};

use crate::heuristics::{detect_language, validate_recipe, Language, RecipeValidation};

/// Title assigned when a page has no recognisable title.
///
/// Validation rejects it, so a record carrying it is never persisted.
pub const UNTITLED: &str = "Sin título";

/// Identifier assigned by a [`RecipeStore`](crate::traits::store::RecipeStore).
pub type RecipeId = i64;

/// A recipe extracted from a single page.
///
/// Times and servings stay free text: every site formats them differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    pub title: String,

    /// Page the recipe was read from. Unique across stored recipes.
    pub source_url: String,

    /// Name of the site adapter that produced the record
    pub source_site: String,

    pub description: Option<String>,
    pub image_url: Option<String>,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub steps: Vec<String>,

    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
}

impl ExtractedRecipe {
    /// Create an empty record for a page.
    pub fn new(
        title: impl Into<String>,
        source_url: impl Into<String>,
        source_site: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source_url: source_url.into(),
            source_site: source_site.into(),
            description: None,
            image_url: None,
            ingredients: Vec::new(),
            steps: Vec::new(),
            prep_time: None,
            cook_time: None,
            servings: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_ingredients(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ingredients = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_steps(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.steps = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prep_time(mut self, value: impl Into<String>) -> Self {
        self.prep_time = Some(value.into());
        self
    }

    pub fn with_cook_time(mut self, value: impl Into<String>) -> Self {
        self.cook_time = Some(value.into());
        self
    }

    pub fn with_servings(mut self, value: impl Into<String>) -> Self {
        self.servings = Some(value.into());
        self
    }

    /// Check title, ingredients and steps for completeness.
    pub fn validate(&self) -> RecipeValidation {
        validate_recipe(&self.title, &self.ingredients, &self.steps)
    }

    /// Detect the language of the record's text content.
    pub fn detect_language(&self) -> Language {
        detect_language(&self.language_sample())
    }

    /// Title, description, ingredients and steps joined into one text.
    pub fn language_sample(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        if let Some(description) = &self.description {
            parts.push(description);
        }
        parts.extend(self.ingredients.iter().map(String::as_str));
        parts.extend(self.steps.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// A recipe accepted and written to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedRecipe {
    pub id: RecipeId,
    pub recipe: ExtractedRecipe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let recipe = ExtractedRecipe::new("Tarta", "https://cookpad.com/r/1", "Cookpad")
            .with_ingredients(["1 taza de harina"])
            .with_steps(["Mezclar todo"])
            .with_servings("4 porciones");

        assert_eq!(recipe.ingredients, vec!["1 taza de harina"]);
        assert_eq!(recipe.servings.as_deref(), Some("4 porciones"));
        assert!(recipe.description.is_none());
        assert!(recipe.validate().valid);
    }

    #[test]
    fn test_untitled_record_is_invalid() {
        let recipe = ExtractedRecipe::new(UNTITLED, "https://x", "X")
            .with_ingredients(["a"])
            .with_steps(["b"]);
        assert!(!recipe.validate().valid);
    }

    #[test]
    fn test_language_sample_includes_all_text() {
        let recipe = ExtractedRecipe::new("Flan", "https://x", "X")
            .with_description("casero")
            .with_ingredients(["leche"])
            .with_steps(["hornear"]);
        assert_eq!(recipe.language_sample(), "Flan casero leche hornear");
    }
}
