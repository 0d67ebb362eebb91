//! soyceliaconoextraterrestre.com
//!
//! Gluten-free blog without recipe-card markup. Ingredients live in one
//! `<p>` split by `<br>` under an "Ingredientes" heading; steps are `<h4>`
//! titles followed by paragraphs under a "Paso a paso" heading; times and
//! servings are written out in prose.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use super::SiteSelectors;
use crate::dom::{element_lines, element_text, next_element_siblings, PageSnapshot};
use crate::traits::strategy::{encode_query, ExtractionStrategy};
use crate::types::{recipe::ExtractedRecipe, search::DietaryFilters};

const SELECTORS: SiteSelectors = SiteSelectors {
    title: &["h1.entry-title", "h1.post-title", "h1"],
    description: &[".entry-content > p:first-of-type", ".recipe-description"],
    image: &[
        ".wp-block-image img",
        "figure.wp-block-image img",
        ".wp-post-image",
        ".entry-content img",
        ".post-thumbnail img",
    ],
    image_attributes: &["data-src", "src"],
    ingredients: &[
        ".wprm-recipe-ingredient",
        ".recipe-ingredients li",
        "[class*=\"ingredientes\"] li",
        ".entry-content ul li",
    ],
    steps: &[
        ".wprm-recipe-instruction",
        ".recipe-instructions li",
        "[class*=\"preparacion\"] li",
        ".entry-content ol li",
    ],
    ..SiteSelectors::EMPTY
};

/// Paragraphs containing any of these are sharing widgets or ads.
const BOILERPLATE: &[&str] = &[
    "publicidad",
    "suscribite",
    "seguinos",
    "compartir",
    "facebook",
    "instagram",
    "twitter",
    "pinterest",
    "youtube",
    "también te puede interesar",
    "te puede interesar",
];

/// Words that mark the paragraph carrying times and servings.
const METADATA_HINTS: &[&str] = &["rinde", "tiempo", "porciones", "minutos"];

/// Lone paragraphs shorter than this are not steps.
const MIN_LOOSE_STEP_LEN: usize = 20;

static RE_SERVINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:rinde\s+(?:para\s+)?(\d+)\s*(?:porciones?|pancitos?|unidades?)?|(\d+)\s*porciones?)",
    )
    .unwrap()
});

static RE_PREP_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tiempo\s+de\s+preparaci[oó]n[:\s]+(\d+\s*(?:minutos?|min|horas?|h))").unwrap()
});

static RE_COOK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)tiempo\s+de\s+cocci[oó]n[:\s]+(\d+\s*(?:minutos?|min|horas?|h)(?:\s*[^\n<]*)?)",
    )
    .unwrap()
});

fn is_boilerplate(text: &str) -> bool {
    let lower = text.to_lowercase();
    BOILERPLATE.iter().any(|b| lower.contains(b))
}

fn tag<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Times and servings parsed from a prose paragraph.
#[derive(Debug, Default, PartialEq, Eq)]
struct ProseMetadata {
    prep_time: Option<String>,
    cook_time: Option<String>,
    servings: Option<String>,
}

fn parse_metadata(paragraph: &str) -> ProseMetadata {
    let servings = RE_SERVINGS.captures(paragraph).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|n| format!("{} porciones", n.as_str()))
    });

    let prep_time = RE_PREP_TIME
        .captures(paragraph)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    let cook_time = RE_COOK_TIME
        .captures(paragraph)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    ProseMetadata {
        prep_time,
        cook_time,
        servings,
    }
}

/// Soy Celíaco No Extraterrestre.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoyCeliaco;

impl SoyCeliaco {
    /// Lines of the first non-empty `<p>` after an `<h2>` mentioning
    /// "ingredientes".
    fn ingredients_from_heading(&self, page: &PageSnapshot) -> Vec<String> {
        let Some(heading) = page.find_heading(&["h2"], &["ingredientes"]) else {
            return Vec::new();
        };

        next_element_siblings(heading)
            .filter(|el| tag(el) == "p")
            .map(element_lines)
            .find(|lines| !lines.is_empty())
            .unwrap_or_default()
    }

    /// Steps between an `<h2>` mentioning "paso a paso" and the next `<h2>`.
    ///
    /// An `<h4>` and the paragraphs right after it form one step
    /// ("title: text"). Other paragraphs become steps on their own when
    /// long enough.
    fn steps_from_heading(&self, page: &PageSnapshot) -> Vec<String> {
        let Some(heading) = page.find_heading(&["h2"], &["paso a paso"]) else {
            return Vec::new();
        };

        let section: Vec<ElementRef<'_>> = next_element_siblings(heading)
            .take_while(|el| tag(el) != "h2")
            .collect();

        let mut steps = Vec::new();
        let mut i = 0;

        while i < section.len() {
            let element = section[i];
            i += 1;

            match tag(&element) {
                "h4" => {
                    let title = element_text(element);
                    let mut content: Vec<String> = Vec::new();

                    while i < section.len() && tag(&section[i]) == "p" {
                        let text = element_text(section[i]);
                        if !text.is_empty() && !is_boilerplate(&text) {
                            content.push(text);
                        }
                        i += 1;
                    }

                    if content.is_empty() {
                        continue;
                    }
                    let content = content.join(" ");
                    if !title.is_empty() && !is_boilerplate(&title) {
                        steps.push(format!("{}: {}", title, content));
                    } else {
                        steps.push(content);
                    }
                }
                "p" => {
                    let text = element_text(element);
                    if text.chars().count() > MIN_LOOSE_STEP_LEN && !is_boilerplate(&text) {
                        steps.push(text);
                    }
                }
                _ => {}
            }
        }

        steps
    }

    /// The first content paragraph that mentions times or servings, else
    /// the first content paragraph.
    fn metadata_paragraph(&self, page: &PageSnapshot) -> Option<String> {
        let paragraphs: Vec<String> = page
            .select_all(".entry-content p")
            .into_iter()
            .map(element_text)
            .collect();

        paragraphs
            .iter()
            .find(|p| {
                let lower = p.to_lowercase();
                METADATA_HINTS.iter().any(|h| lower.contains(h))
            })
            .or_else(|| paragraphs.first())
            .cloned()
    }
}

impl ExtractionStrategy for SoyCeliaco {
    fn site_name(&self) -> &'static str {
        "Soy Celíaco No Extraterrestre"
    }

    fn supported_domains(&self) -> &'static [&'static str] {
        &["soyceliaconoextraterrestre.com"]
    }

    fn build_search_url(&self, keyword: Option<&str>, _filters: &DietaryFilters) -> String {
        match keyword.filter(|k| !k.trim().is_empty()) {
            Some(keyword) => format!(
                "https://www.soyceliaconoextraterrestre.com/?s={}",
                encode_query(keyword)
            ),
            None => "https://www.soyceliaconoextraterrestre.com/recetas/".to_string(),
        }
    }

    fn search_result_selectors(&self) -> &'static [&'static str] {
        &["article a", ".entry-title a", "a[href*=\"receta\"]"]
    }

    fn extract_recipe(&self, page: &PageSnapshot, url: &str) -> ExtractedRecipe {
        let mut recipe = SELECTORS.extract(page, url, self.site_name());

        let ingredients = self.ingredients_from_heading(page);
        if !ingredients.is_empty() {
            recipe.ingredients = ingredients;
        }

        let steps = self.steps_from_heading(page);
        if !steps.is_empty() {
            recipe.steps = steps;
        }

        if let Some(paragraph) = self.metadata_paragraph(page) {
            let metadata = parse_metadata(&paragraph);
            recipe.prep_time = metadata.prep_time;
            recipe.cook_time = metadata.cook_time;
            recipe.servings = metadata.servings;
        }

        recipe
    }
}
