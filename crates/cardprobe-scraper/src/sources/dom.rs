//! Thin query layer over a parsed HTML document.

use scraper::{ElementRef, Html, Selector};

use crate::parse::collapse_whitespace;

/// Parses `css`. Only called with literal selectors.
pub(super) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub(super) struct Document {
    html: Html,
}

impl Document {
    pub(super) fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub(super) fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub(super) fn all<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// Whitespace-collapsed text of the first match, `None` if empty.
    pub(super) fn text(&self, selector: &Selector) -> Option<String> {
        self.first(selector).and_then(|el| element_text(&el))
    }

    /// Trimmed attribute of the first match, `None` if absent or empty.
    pub(super) fn attr(&self, selector: &Selector, name: &str) -> Option<String> {
        self.first(selector)
            .and_then(|el| el.value().attr(name))
            .map(collapse_whitespace)
            .filter(|v| !v.is_empty())
    }

    pub(super) fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }
}

/// Whitespace-collapsed text content of `element`, `None` if empty.
pub(super) fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = collapse_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Text of the first descendant of `element` matching `selector`.
pub(super) fn child_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| element_text(&el))
}
