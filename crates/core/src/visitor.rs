//! Reading-order walk from an HTML subtree to [`ContentElement`]s.
//!
//! Dispatch goes through a table mapping tag names to a [`VisitRule`]. Tags
//! without a rule are descended into, so supporting a new element kind is a
//! matter of adding an entry with [`DocumentVisitor::with_rule`].
//!
//! # Example
//!
//! ```rust
//! use novelthread_core::parse::Document;
//! use novelthread_core::{ContentElement, DocumentVisitor};
//!
//! let doc = Document::parse_fragment("第一章<br>正文", None);
//! let elements = DocumentVisitor::new(None).visit(doc.root()).unwrap();
//! assert_eq!(
//!     elements,
//!     vec![ContentElement::text("第一章"), ContentElement::LineBreak, ContentElement::text("正文")]
//! );
//! ```

use std::collections::HashMap;

use scraper::{ElementRef, Node};
use url::Url;

use crate::layout::ForumLayout;
use crate::novel::ContentElement;
use crate::parse::Element;
use crate::{NovelError, Result};

/// What the visitor does when it meets an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitRule {
    /// Emit [`ContentElement::LineBreak`].
    LineBreak,
    /// Emit [`ContentElement::Image`] from the raw-source attribute or `src`.
    Image,
    /// Emit [`ContentElement::Link`] with the element's text as label.
    Link,
    /// Descend into children; the element itself contributes nothing.
    PassThrough,
    /// Drop the element and everything below it.
    Skip,
}

/// Converts HTML subtrees into flat content element sequences.
///
/// The visitor holds no mutable state: visiting the same subtree twice
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct DocumentVisitor {
    rules: HashMap<String, VisitRule>,
    image_source_attr: Option<String>,
    base_url: Option<Url>,
}

impl DocumentVisitor {
    /// A visitor with rules for `br`, `img` and `a`.
    ///
    /// Relative URLs are resolved against `base_url` when one is given.
    pub fn new(base_url: Option<Url>) -> Self {
        let rules = [("br", VisitRule::LineBreak), ("img", VisitRule::Image), ("a", VisitRule::Link)]
            .into_iter()
            .map(|(tag, rule)| (tag.to_string(), rule))
            .collect();

        Self { rules, image_source_attr: None, base_url }
    }

    /// A visitor configured with the layout's raw-source attribute and pass-through tag.
    pub fn for_layout(layout: &ForumLayout, base_url: Option<Url>) -> Self {
        Self::new(base_url)
            .with_image_source_attr(&layout.image_source_attr)
            .with_rule(&layout.pass_through_tag, VisitRule::PassThrough)
    }

    /// Adds or replaces the rule for `tag`.
    pub fn with_rule(mut self, tag: &str, rule: VisitRule) -> Self {
        self.rules.insert(tag.to_ascii_lowercase(), rule);
        self
    }

    /// Attribute consulted before `src` when resolving image URLs.
    pub fn with_image_source_attr(mut self, attr: &str) -> Self {
        self.image_source_attr = Some(attr.to_string());
        self
    }

    pub fn rule_for(&self, tag: &str) -> Option<VisitRule> {
        self.rules.get(tag).copied()
    }

    /// Visits `element` and its descendants depth-first, left to right.
    ///
    /// # Errors
    ///
    /// Returns [`NovelError::UrlResolutionError`] when an image or link URL
    /// cannot be made absolute.
    pub fn visit(&self, element: Element<'_>) -> Result<Vec<ContentElement>> {
        let mut out = Vec::new();
        self.visit_element(element.element_ref(), &mut out)?;
        Ok(out)
    }

    fn visit_element(&self, element: ElementRef<'_>, out: &mut Vec<ContentElement>) -> Result<()> {
        match self.rule_for(element.value().name()) {
            Some(VisitRule::LineBreak) => out.push(ContentElement::LineBreak),
            Some(VisitRule::Image) => {
                let raw = self
                    .image_source_attr
                    .as_deref()
                    .and_then(|attr| element.value().attr(attr))
                    .or_else(|| element.value().attr("src"));
                if let Some(raw) = raw {
                    out.push(ContentElement::image(self.absolute_url(raw)?));
                }
            }
            Some(VisitRule::Link) => match element.value().attr("href") {
                Some(href) => {
                    let label = element.text().collect::<String>();
                    out.push(ContentElement::link(self.absolute_url(href)?, label.trim()));
                }
                None => self.visit_inner(element, out)?,
            },
            Some(VisitRule::PassThrough) | None => self.visit_inner(element, out)?,
            Some(VisitRule::Skip) => {}
        }
        Ok(())
    }

    fn visit_inner(&self, element: ElementRef<'_>, out: &mut Vec<ContentElement>) -> Result<()> {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push(ContentElement::text(&**text)),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.visit_element(child, out)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn absolute_url(&self, raw: &str) -> Result<String> {
        let resolved = match &self.base_url {
            Some(base) => base.join(raw),
            None => Url::parse(raw),
        };
        resolved
            .map(String::from)
            .map_err(|source| NovelError::UrlResolutionError { url: raw.to_string(), source })
    }
}
