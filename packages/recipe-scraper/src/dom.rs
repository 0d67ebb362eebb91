//! Read-only DOM queries over a loaded page.
//!
//! A [`PageSnapshot`] is the rendered HTML of a page parsed with `scraper`.
//! Every query takes an ordered list of selectors and stops at the first
//! one that yields something, so site adapters can declare their fallback
//! chains as plain data.
//!
//! `scraper::Html` is not `Send`: snapshots are built and dropped inside
//! synchronous code and never held across an `.await`.

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

use crate::types::search::SearchCandidate;

/// Attributes holding an image URL, tried in order.
pub const IMAGE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];

/// Elements that start a new line when flattening text.
const BLOCK_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "section",
    "article", "header", "footer", "blockquote",
];

/// Parse a CSS selector, logging and skipping invalid ones.
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector = %selector, error = %e, "Skipping invalid selector");
            None
        }
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text of an element split into lines at `<br>` and block boundaries.
///
/// Blank lines are dropped and each line is whitespace-normalized.
pub fn element_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut raw = String::new();

    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Next sibling elements of `element`, skipping text and comment nodes.
pub fn next_element_siblings<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

/// Whether an element matches any selector in the list.
pub fn matches_any(element: &ElementRef<'_>, selectors: &[Selector]) -> bool {
    selectors.iter().any(|s| s.matches(element))
}

/// A loaded page ready for DOM queries.
pub struct PageSnapshot {
    url: String,
    base: Option<Url>,
    html: Html,
}

impl PageSnapshot {
    /// Parse the rendered HTML of `url`.
    pub fn parse(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            base: Url::parse(url).ok(),
            html: Html::parse_document(html),
        }
    }

    /// URL the page was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The parsed document.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// All elements matching one selector, in document order.
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(parsed) => self.html.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    /// Text of the first element with non-empty text, trying each selector
    /// in order.
    pub fn select_first_text(&self, selectors: &[&str]) -> Option<String> {
        for selector in selectors {
            let found = self
                .select_all(selector)
                .into_iter()
                .map(element_text)
                .find(|text| !text.is_empty());

            if let Some(text) = found {
                return Some(text);
            }
            debug!(selector = %selector, url = %self.url, "No text for selector");
        }
        None
    }

    /// Non-empty texts of every element matched by the first selector that
    /// yields at least one.
    pub fn select_texts(&self, selectors: &[&str]) -> Vec<String> {
        for selector in selectors {
            let texts: Vec<String> = self
                .select_all(selector)
                .into_iter()
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();

            if !texts.is_empty() {
                return texts;
            }
            debug!(selector = %selector, url = %self.url, "No items for selector");
        }
        Vec::new()
    }

    /// First usable URL-valued attribute, trying each selector in order and
    /// each attribute in order per element.
    ///
    /// `data:` placeholders are skipped; relative URLs are resolved against
    /// the page URL.
    pub fn select_url_attr(&self, selectors: &[&str], attributes: &[&str]) -> Option<String> {
        for selector in selectors {
            for element in self.select_all(selector) {
                for attr in attributes {
                    let Some(value) = element.value().attr(attr) else {
                        continue;
                    };
                    let value = value.trim();
                    if value.is_empty() || value.starts_with("data:") {
                        continue;
                    }
                    if let Some(resolved) = self.resolve_url(value) {
                        return Some(resolved);
                    }
                }
            }
        }
        None
    }

    /// Resolve an `href`/`src` against the page URL. Only http(s) results
    /// are returned.
    pub fn resolve_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let resolved = match &self.base {
            Some(base) => base.join(href).ok()?,
            None => Url::parse(href).ok()?,
        };

        matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
    }

    /// Lines of content following the first heading whose text contains a
    /// keyword.
    ///
    /// The heading's next sibling element is read (skipping `<br>`/`<hr>`);
    /// when the heading has no such sibling, its parent's next sibling is
    /// used. List items win; otherwise paragraphs split at `<br>`; otherwise
    /// the element's own lines.
    pub fn items_after_heading(&self, heading_selectors: &[&str], keywords: &[&str]) -> Vec<String> {
        let Some(heading) = self.find_heading(heading_selectors, keywords) else {
            return Vec::new();
        };

        let next = next_element_siblings(heading)
            .find(|el| !matches!(el.value().name(), "br" | "hr"))
            .or_else(|| {
                heading
                    .parent()
                    .and_then(ElementRef::wrap)
                    .and_then(|parent| next_element_siblings(parent).next())
            });

        match next {
            Some(content) => content_items(content),
            None => Vec::new(),
        }
    }

    /// First heading (in selector order) whose lowercased text contains any
    /// of the keywords.
    pub fn find_heading(&self, heading_selectors: &[&str], keywords: &[&str]) -> Option<ElementRef<'_>> {
        for selector in heading_selectors {
            for element in self.select_all(selector) {
                let text = element_text(element).to_lowercase();
                if keywords.iter().any(|k| text.contains(k)) {
                    return Some(element);
                }
            }
        }
        None
    }

    /// Links from the first selector that yields at least one, resolved,
    /// de-duplicated and truncated to `limit`.
    ///
    /// A matched element that is not an anchor contributes its first
    /// descendant `a[href]`. Preview images come from an `img` inside the
    /// matched element.
    pub fn select_links(&self, selectors: &[&str], limit: usize) -> Vec<SearchCandidate> {
        if limit == 0 {
            return Vec::new();
        }

        let anchor = parse_selector("a[href]");
        let image = parse_selector("img");

        for selector in selectors {
            let mut seen = HashSet::new();
            let mut candidates = Vec::new();

            for element in self.select_all(selector) {
                let link = if element.value().name() == "a" {
                    Some(element)
                } else {
                    anchor.as_ref().and_then(|a| element.select(a).next())
                };

                let Some(link) = link else { continue };
                let Some(url) = link.value().attr("href").and_then(|h| self.resolve_url(h)) else {
                    continue;
                };
                if !seen.insert(url.clone()) {
                    continue;
                }

                let mut candidate = SearchCandidate::new(url);
                let title = element_text(element);
                if !title.is_empty() {
                    candidate = candidate.with_title(title);
                }
                let preview = image.as_ref().and_then(|img| element.select(img).next()).and_then(|img| {
                    IMAGE_ATTRIBUTES.iter().find_map(|attr| {
                        img.value()
                            .attr(attr)
                            .filter(|v| !v.starts_with("data:"))
                            .and_then(|v| self.resolve_url(v))
                    })
                });
                if let Some(preview) = preview {
                    candidate = candidate.with_preview_image(preview);
                }

                candidates.push(candidate);
                if candidates.len() >= limit {
                    break;
                }
            }

            if !candidates.is_empty() {
                return candidates;
            }
        }

        Vec::new()
    }
}

/// Items of a content block: `li` texts, else `<br>`-split paragraphs,
/// else the block's own lines.
fn content_items(content: ElementRef<'_>) -> Vec<String> {
    let is_list_item = content.value().name() == "li";
    if let Some(li) = parse_selector("li") {
        let items: Vec<String> = content
            .select(&li)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        if !items.is_empty() && !is_list_item {
            return items;
        }
    }

    if let Some(p) = parse_selector("p") {
        let items: Vec<String> = content.select(&p).flat_map(element_lines).collect();
        if !items.is_empty() {
            return items;
        }
    }

    element_lines(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1 class="title">  Tarta   de manzana </h1>
          <div class="empty"></div>
          <ul class="ingredients"><li>3 manzanas</li><li> </li><li>200 g de harina</li></ul>
          <img class="lazy" src="data:image/gif;base64,AAAA" data-src="/img/tarta.jpg">
          <div class="content">
            <h2>Ingredientes</h2>
            <p>1 taza de azúcar<br>2 huevos<br>  <br>Manteca</p>
            <h3>Preparación</h3>
            <ol><li>Batir los huevos</li><li>Hornear 40 minutos</li></ol>
          </div>
          <div class="results">
            <article><a href="/recetas/1"><img src="/p/1.jpg">Tarta</a></article>
            <article><a href="/recetas/1">Tarta otra vez</a></article>
            <article><a href="https://example.com/recetas/2">Flan</a></article>
            <article><a href="javascript:void(0)">Nada</a></article>
          </div>
        </body></html>
    "#;

    fn snapshot() -> PageSnapshot {
        PageSnapshot::parse("https://example.com/recetas/tarta", PAGE)
    }

    #[test]
    fn test_first_text_falls_through_chain() {
        let page = snapshot();
        assert_eq!(
            page.select_first_text(&[".missing", ".empty", "h1.title"]).as_deref(),
            Some("Tarta de manzana")
        );
        assert_eq!(page.select_first_text(&[".missing"]), None);
    }

    #[test]
    fn test_texts_skip_blank_items() {
        let page = snapshot();
        assert_eq!(
            page.select_texts(&["ul.nothing li", "ul.ingredients li"]),
            vec!["3 manzanas", "200 g de harina"]
        );
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let page = snapshot();
        assert_eq!(
            page.select_first_text(&["h1[[", "h1"]).as_deref(),
            Some("Tarta de manzana")
        );
    }

    #[test]
    fn test_image_skips_data_uri_and_resolves() {
        let page = snapshot();
        assert_eq!(
            page.select_url_attr(&["img.lazy"], IMAGE_ATTRIBUTES).as_deref(),
            Some("https://example.com/img/tarta.jpg")
        );
    }

    #[test]
    fn test_items_after_heading_splits_breaks() {
        let page = snapshot();
        assert_eq!(
            page.items_after_heading(&["h2", "h3"], &["ingredientes"]),
            vec!["1 taza de azúcar", "2 huevos", "Manteca"]
        );
        assert_eq!(
            page.items_after_heading(&["h2", "h3"], &["preparación"]),
            vec!["Batir los huevos", "Hornear 40 minutos"]
        );
        assert!(page.items_after_heading(&["h2"], &["notas"]).is_empty());
    }

    #[test]
    fn test_links_resolve_and_dedupe() {
        let page = snapshot();
        let links = page.select_links(&[".nothing a", ".results article"], 10);
        let urls: Vec<&str> = links.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://example.com/recetas/1", "https://example.com/recetas/2"]
        );
        assert_eq!(links[0].title.as_deref(), Some("Tarta"));
        assert_eq!(links[0].preview_image.as_deref(), Some("https://example.com/p/1.jpg"));
    }

    #[test]
    fn test_links_respect_limit() {
        let page = snapshot();
        assert_eq!(page.select_links(&[".results a"], 1).len(), 1);
        assert!(page.select_links(&[".results a"], 0).is_empty());
    }

    #[test]
    fn test_element_lines() {
        let html = Html::parse_fragment("<p>uno<br>dos <b>tres</b><br><br>cuatro</p>");
        let p = Selector::parse("p").unwrap();
        let element = html.select(&p).next().unwrap();
        assert_eq!(element_lines(element), vec!["uno", "dos tres", "cuatro"]);
    }
}
