//! Site-agnostic text heuristics.
//!
//! Pure functions with no I/O, applied after a site adapter has produced a
//! record:
//!
//! - [`detect_language`] - keyword-frequency vote between Spanish and English
//! - [`validate_recipe`] - completeness check on title, ingredients and steps
//! - [`separate_ingredients_and_steps`] - classify a flat list of mixed items

pub mod classify;
pub mod language;
pub mod validation;

pub use classify::{classify_item, separate_ingredients_and_steps, ItemKind};
pub use language::{detect_language, Language};
pub use validation::{validate_recipe, RecipeValidation};
