//! Search inputs and search-results types.

use serde::{Deserialize, Serialize};

/// Dietary preferences attached to a search.
///
/// Informational: only some site adapters translate them into query terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryFilters {
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
}

impl DietaryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gluten_free(mut self, on: bool) -> Self {
        self.gluten_free = on;
        self
    }

    pub fn with_vegetarian(mut self, on: bool) -> Self {
        self.vegetarian = on;
        self
    }

    pub fn with_vegan(mut self, on: bool) -> Self {
        self.vegan = on;
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.gluten_free || self.vegetarian || self.vegan)
    }

    /// Query terms for the active filters, given the words a site uses.
    pub fn terms<'a>(&self, gluten_free: &'a str, vegetarian: &'a str, vegan: &'a str) -> Vec<&'a str> {
        let mut terms = Vec::new();
        if self.gluten_free {
            terms.push(gluten_free);
        }
        if self.vegetarian {
            terms.push(vegetarian);
        }
        if self.vegan {
            terms.push(vegan);
        }
        terms
    }
}

/// A lightweight entry from a search-results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub url: String,
    pub title: Option<String>,
    pub preview_image: Option<String>,
}

impl SearchCandidate {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            preview_image: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_preview_image(mut self, image: impl Into<String>) -> Self {
        self.preview_image = Some(image.into());
        self
    }
}

/// A registered site and the domains it handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedSite {
    pub name: String,
    pub domains: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_terms_follow_flags() {
        let filters = DietaryFilters::new().with_gluten_free(true).with_vegan(true);
        assert_eq!(
            filters.terms("sin gluten", "vegetariano", "vegano"),
            vec!["sin gluten", "vegano"]
        );
        assert!(DietaryFilters::default().is_empty());
    }
}
