//! Ingredient/step separation for pages that mix both in one list.

use regex::Regex;
use std::sync::LazyLock;

/// Items shorter than this that carry a quantity are ingredients.
const QUANTITY_MAX_LEN: usize = 100;

/// Items longer than this are steps.
const STEP_MIN_LEN: usize = 80;

/// Remaining items shorter than this are ingredients.
const SHORT_INGREDIENT_LEN: usize = 50;

/// A number followed by a measuring unit.
static RE_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+(?:[.,]\d+)?\s*(?:g|gr|grs|gramo|kg|kilo|ml|l|litro|cc|taza|cucharada|cucharadita|cda|cdita|unidad|diente|pizca|cup|tablespoon|teaspoon|tbsp|tsp|unit|clove|pinch|gram|liter|oz|lb)(?:es|s)?\b",
    )
    .unwrap()
});

/// A cooking verb at the start of a word.
static RE_COOKING_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:mezclar|cocinar|hornear|agregar|batir|freír|freir|hervir|cortar|picar|revolver|calentar|dejar reposar|colocar|poner|servir|decorar|reservar|incorporar|condimentar|precalentar|retirar|escurrir|mix|cook|bake|add|beat|fry|boil|cut|chop|stir|heat|let stand|place|put|serve|garnish|reserve|incorporate|season|preheat|remove|drain)",
    )
    .unwrap()
});

/// Which list a free-text item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Ingredient,
    Step,
}

/// Classify one item. Blank items yield `None`.
///
/// Rules, first match wins:
/// 1. shorter than 100 chars with a quantity -> ingredient
/// 2. longer than 80 chars, or contains a cooking verb -> step
/// 3. shorter than 50 chars -> ingredient
/// 4. step
pub fn classify_item(item: &str) -> Option<ItemKind> {
    let text = item.trim();
    if text.is_empty() {
        return None;
    }

    let len = text.chars().count();

    if len < QUANTITY_MAX_LEN && RE_QUANTITY.is_match(text) {
        return Some(ItemKind::Ingredient);
    }

    if len > STEP_MIN_LEN || RE_COOKING_VERB.is_match(text) {
        return Some(ItemKind::Step);
    }

    if len < SHORT_INGREDIENT_LEN {
        return Some(ItemKind::Ingredient);
    }

    Some(ItemKind::Step)
}

/// Split a flat list into `(ingredients, steps)`, keeping input order.
pub fn separate_ingredients_and_steps<I, S>(items: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ingredients = Vec::new();
    let mut steps = Vec::new();

    for item in items {
        let text = item.as_ref().trim();
        match classify_item(text) {
            Some(ItemKind::Ingredient) => ingredients.push(text.to_string()),
            Some(ItemKind::Step) => steps.push(text.to_string()),
            None => {}
        }
    }

    (ingredients, steps)
}
