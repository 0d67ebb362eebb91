//! Completeness validation for extracted recipes.

use serde::{Deserialize, Serialize};

use crate::types::recipe::UNTITLED;

/// Outcome of [`validate_recipe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeValidation {
    pub valid: bool,

    /// Every problem found, joined with `"; "`. Empty when valid.
    pub reason: String,
}

impl RecipeValidation {
    /// Convert into a `Result` carrying the reason on failure.
    pub fn into_result(self) -> Result<(), String> {
        if self.valid {
            Ok(())
        } else {
            Err(self.reason)
        }
    }
}

/// Whether a title is the placeholder assigned to untitled pages.
pub fn is_placeholder_title(title: &str) -> bool {
    let title = title.trim();
    title.eq_ignore_ascii_case(UNTITLED) || title.eq_ignore_ascii_case("untitled")
}

/// Check that a recipe has a real title, at least one ingredient and at
/// least one step. All problems are reported together.
pub fn validate_recipe(title: &str, ingredients: &[String], steps: &[String]) -> RecipeValidation {
    let mut reasons: Vec<&str> = Vec::new();

    if title.trim().is_empty() {
        reasons.push("missing title (título)");
    } else if is_placeholder_title(title) {
        reasons.push("title could not be extracted (sin título)");
    }

    if ingredients.is_empty() {
        reasons.push("no ingredients found");
    } else if ingredients.iter().all(|i| i.trim().is_empty()) {
        reasons.push("all ingredients are blank");
    }

    if steps.is_empty() {
        reasons.push("no steps (pasos) found");
    } else if steps.iter().all(|s| s.trim().is_empty()) {
        reasons.push("all steps are blank");
    }

    RecipeValidation {
        valid: reasons.is_empty(),
        reason: reasons.join("; "),
    }
}
