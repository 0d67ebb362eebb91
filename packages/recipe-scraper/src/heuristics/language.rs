//! Keyword-frequency language detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spanish cooking vocabulary.
const SPANISH_KEYWORDS: &[&str] = &[
    "ingredientes",
    "preparación",
    "cucharada",
    "cucharadita",
    "taza",
    "harina",
    "azúcar",
    "huevos",
    "cebolla",
    "horno",
    "minutos",
    "agregar",
    "mezclar",
    "cocinar",
    "hervir",
    "picar",
    "fuego",
    "receta",
    "manteca",
    "pimienta",
    "aceite",
    "leche",
    "porciones",
    "sartén",
    "batir",
];

/// English cooking vocabulary.
const ENGLISH_KEYWORDS: &[&str] = &[
    "ingredients",
    "preparation",
    "tablespoon",
    "teaspoon",
    "cup",
    "flour",
    "sugar",
    "eggs",
    "onion",
    "oven",
    "minutes",
    "add",
    "mix",
    "cook",
    "boil",
    "chop",
    "heat",
    "recipe",
    "butter",
    "pepper",
    "oil",
    "milk",
    "servings",
    "skillet",
    "whisk",
];

/// Detected language of a recipe's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Unknown,
}

impl Language {
    /// ISO 639-1 code, or `"unknown"`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Unknown => "unknown",
        }
    }

    /// Parse an ISO 639-1 code. Anything unrecognised is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "es" => Language::Es,
            "en" => Language::En,
            _ => Language::Unknown,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Count every occurrence of every keyword in already-lowercased text.
fn keyword_hits(text_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|k| text_lower.matches(k).count())
        .sum()
}

/// Vote between the Spanish and English vocabularies.
///
/// Returns the side with strictly more hits; a tie (including no hits at
/// all) is `Unknown`.
pub fn detect_language(text: &str) -> Language {
    let text_lower = text.to_lowercase();

    let spanish = keyword_hits(&text_lower, SPANISH_KEYWORDS);
    let english = keyword_hits(&text_lower, ENGLISH_KEYWORDS);

    if spanish > english {
        Language::Es
    } else if english > spanish {
        Language::En
    } else {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spanish_vocabulary_detects_es() {
        assert_eq!(detect_language(&SPANISH_KEYWORDS.join(" ")), Language::Es);
    }

    #[test]
    fn test_english_vocabulary_detects_en() {
        assert_eq!(detect_language(&ENGLISH_KEYWORDS.join(" ")), Language::En);
    }

    #[test]
    fn test_recipe_texts() {
        let cases = [
            (
                "Mezclar la harina con el azúcar y los huevos. Llevar al horno 30 minutos.",
                Language::Es,
            ),
            (
                "Whisk the flour with the sugar and eggs, then bake in the oven for 30 minutes.",
                Language::En,
            ),
            ("Lorem ipsum dolor sit amet", Language::Unknown),
            ("", Language::Unknown),
        ];

        for (text, expected) in cases {
            assert_eq!(detect_language(text), expected, "Text: {}", text);
        }
    }

    #[test]
    fn test_tie_is_unknown() {
        assert_eq!(detect_language("harina flour"), Language::Unknown);
        assert_eq!(detect_language("HARINA y FLOUR"), Language::Unknown);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_language("HARINA, LECHE"), Language::Es);
    }

    #[test]
    fn test_code_roundtrip() {
        for lang in [Language::Es, Language::En] {
            assert_eq!(Language::from_code(lang.code()), lang);
        }
        assert_eq!(Language::from_code("fr"), Language::Unknown);
    }

    proptest! {
        #[test]
        fn prop_text_without_letters_is_unknown(text in "[0-9 .,;:!?()-]{0,200}") {
            prop_assert_eq!(detect_language(&text), Language::Unknown);
        }

        #[test]
        fn prop_spanish_words_alone_detect_es(
            words in proptest::sample::subsequence(SPANISH_KEYWORDS.to_vec(), 1..SPANISH_KEYWORDS.len())
        ) {
            prop_assert_eq!(detect_language(&words.join(" ")), Language::Es);
        }

        #[test]
        fn prop_english_words_alone_detect_en(
            words in proptest::sample::subsequence(ENGLISH_KEYWORDS.to_vec(), 1..ENGLISH_KEYWORDS.len())
        ) {
            prop_assert_eq!(detect_language(&words.join(" ")), Language::En);
        }
    }
}
