//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types used by the
//! crawler: a parsed page that remembers the URL it came from, and a thin
//! wrapper over `scraper` element handles with CSS-selector queries.
//!
//! # Example
//!
//! ```rust
//! use novelthread_core::parse::Document;
//!
//! let html = r#"<div id="postlist"><div class="plhin" id="pid7"><p>Hi</p></div></div>"#;
//! let doc = Document::parse(html).unwrap();
//! let posts = doc.select("#postlist .plhin").unwrap();
//! assert_eq!(posts[0].id(), Some("pid7"));
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{NovelError, Result};

/// Parses a CSS selector, mapping failures to [`NovelError::HtmlParseError`].
pub(crate) fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| NovelError::HtmlParseError(format!("Invalid selector '{}': {}", selector, e)))
}

/// A parsed HTML document.
///
/// Pages fetched by the crawler carry the URL they were fetched from so that
/// relative image and link targets can be resolved against it.
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: None })
    }

    /// Parses a full HTML document fetched from `base_url`.
    pub fn parse_with_url(html: &str, base_url: Url) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// Parses an HTML fragment, such as the cleaned body of one post.
    pub fn parse_fragment(html: &str, base_url: Option<Url>) -> Self {
        Self { html: Html::parse_fragment(html), base_url }
    }

    /// Gets the URL this document was fetched from.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// The root element: `<html>` for documents, the synthetic wrapper for fragments.
    pub fn root(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }
}

/// A wrapper around scraper's `ElementRef`.
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    pub(crate) fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }

    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// The first child that is an element, skipping text and comments.
    pub fn first_element_child(&self) -> Option<Element<'a>> {
        self.element.children().find_map(ElementRef::wrap).map(|el| Element { element: el })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching a CSS selector.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }
}
