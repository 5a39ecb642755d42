//! The extracted novel: content elements, chapters, and the novel aggregate.
//!
//! Chapters are built by the crawler, one per qualifying post, and handed to
//! the assembler which filters them and fills in the novel's metadata. The
//! finished [`Novel`] is what generators consume.

use serde::Serialize;

/// One atomic unit of rendered prose, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    Text { content: String },
    LineBreak,
    Image { url: String },
    Link { url: String, label: String },
}

impl ContentElement {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Link { url: url.into(), label: label.into() }
    }
}

/// How generators should style a chapter's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderType {
    /// The first line is the novel title.
    Title,
    /// The first line is a chapter heading.
    Chapter,
}

/// The narrative content of one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chapter {
    contents: Vec<ContentElement>,
    header_type: Option<HeaderType>,
}

impl Chapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contents(contents: Vec<ContentElement>) -> Self {
        Self { contents, header_type: None }
    }

    pub fn push(&mut self, element: ContentElement) {
        self.contents.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = ContentElement>) {
        self.contents.extend(elements);
    }

    pub fn contents(&self) -> &[ContentElement] {
        &self.contents
    }

    pub fn header_type(&self) -> Option<HeaderType> {
        self.header_type
    }

    pub(crate) fn set_header_type(&mut self, header_type: HeaderType) {
        self.header_type = Some(header_type);
    }

    /// Logical lines of text.
    ///
    /// Text runs between line breaks are joined into one line, trimmed, and
    /// dropped when empty. Images and links do not contribute.
    pub fn text_contents(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for element in &self.contents {
            match element {
                ContentElement::Text { content } => current.push_str(content),
                ContentElement::LineBreak => flush_line(&mut current, &mut lines),
                ContentElement::Image { .. } | ContentElement::Link { .. } => {}
            }
        }
        flush_line(&mut current, &mut lines);

        lines
    }

    /// Character count over [`Chapter::text_contents`].
    pub fn text_length(&self) -> usize {
        self.text_contents().iter().map(|line| line.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    current.clear();
}

/// The aggregate handed to generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Novel {
    pub title: Option<String>,
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
    /// Thread URL the novel was crawled from.
    pub source_url: Option<String>,
}

impl Novel {
    /// Title, or `"untitled"` when none was inferred.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }

    /// Total characters across all chapters.
    pub fn text_length(&self) -> usize {
        self.chapters.iter().map(Chapter::text_length).sum()
    }
}
