//! DOM utility functions for navigating and extracting text from parsed HTML.

use scraper::{ElementRef, Selector};

use crate::error::{HarvesterError, Result};

/// Compile a CSS selector.
///
/// # Examples
/// ```
/// use rera_harvester::html::compile_selector;
///
/// assert!(compile_selector("label.label-control").is_ok());
/// assert!(compile_selector("label[").is_err());
/// ```
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HarvesterError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Get the lowercase tag name of an element.
pub fn get_tag_name<'a>(element: ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Check if any class of the element contains `fragment`.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use rera_harvester::html::class_contains;
///
/// let html = Html::parse_fragment(r#"<div class="col details-project-overview"></div>"#);
/// let div = html.select(&Selector::parse("div").unwrap()).next().unwrap();
/// assert!(class_contains(div, "details-project"));
/// assert!(!class_contains(div, "ms-3"));
/// ```
pub fn class_contains(element: ElementRef<'_>, fragment: &str) -> bool {
    element.value().classes().any(|c| c.contains(fragment))
}

/// Get the parent element, skipping the document node.
pub fn parent_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Find the nearest ancestor element satisfying `predicate`.
pub fn find_ancestor<'a>(
    element: ElementRef<'a>,
    predicate: impl Fn(ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| predicate(*a))
}

/// Find the first descendant element (document order) with the given tag name.
pub fn find_descendant<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|d| get_tag_name(*d) == tag)
}

/// Check if the element has a descendant with any of the given tag names.
pub fn has_descendant_tag(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(|n| n.value().as_element())
        .any(|e| tags.contains(&e.name()))
}

/// All descendant text, concatenated as-is.
pub fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Descendant text with every fragment trimmed and empty fragments dropped,
/// concatenated without a separator.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use rera_harvester::html::stripped_text;
///
/// let html = Html::parse_fragment("<strong>  ABC <i> Pvt </i>Ltd  </strong>");
/// let strong = html.select(&Selector::parse("strong").unwrap()).next().unwrap();
/// assert_eq!(stripped_text(strong), "ABCPvtLtd");
/// ```
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(html: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_compile_selector_error_message() {
        let err = compile_selector("div[").unwrap_err();
        assert!(err.to_string().contains("div["));
    }

    #[test]
    fn test_get_tag_name() {
        let html = Html::parse_fragment("<section><STRONG>x</STRONG></section>");
        assert_eq!(get_tag_name(first(&html, "strong")), "strong");
    }

    #[test]
    fn test_find_ancestor() {
        let html = Html::parse_fragment(
            r#"<div class="details-project"><div class="ms-3"><label>x</label></div></div>"#,
        );
        let label = first(&html, "label");

        let nearest = find_ancestor(label, |a| get_tag_name(a) == "div").unwrap();
        assert!(class_contains(nearest, "ms-3"));

        let outer = find_ancestor(label, |a| class_contains(a, "details-project"));
        assert!(outer.is_some());

        assert!(find_ancestor(label, |a| get_tag_name(a) == "table").is_none());
    }

    #[test]
    fn test_parent_element() {
        let html = Html::parse_fragment("<p><span>x</span></p>");
        let span = first(&html, "span");
        assert_eq!(get_tag_name(parent_element(span).unwrap()), "p");
    }

    #[test]
    fn test_find_descendant_skips_self() {
        let html = Html::parse_fragment("<strong><b>inner</b></strong>");
        let strong = first(&html, "strong");
        assert!(find_descendant(strong, "strong").is_none());
        assert_eq!(full_text(find_descendant(strong, "b").unwrap()), "inner");
    }

    #[test]
    fn test_has_descendant_tag() {
        let html = Html::parse_fragment("<span id='a'>x <strong>y</strong></span><span id='b'>z</span>");
        assert!(has_descendant_tag(first(&html, "span#a"), &["strong", "div"]));
        assert!(!has_descendant_tag(first(&html, "span#b"), &["strong", "span"]));
    }

    #[test]
    fn test_full_and_stripped_text() {
        let html = Html::parse_fragment("<p>  Plot 12 <em> A </em></p>");
        let p = first(&html, "p");
        assert_eq!(full_text(p), "  Plot 12  A ");
        assert_eq!(stripped_text(p), "Plot 12A");
    }
}
