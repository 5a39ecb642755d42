use crate::novel::{Chapter, ContentElement, Novel};

/// Separator placed between chapters.
pub const CHAPTER_SEPARATOR: &str = "\n\n\n\n";

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Start the output with title and author lines
    pub include_header: bool,
}

/// Plain text formatter for a finished novel
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, novel: &Novel) -> String {
        convert_to_text(novel, &self.config)
    }
}

/// Render a novel as plain text.
///
/// Text runs are written as they were found on the page, line breaks become
/// newlines, images become `<此处为插图 URL>` placeholders and links their URL.
pub fn convert_to_text(novel: &Novel, config: &TextConfig) -> String {
    let body = novel.chapters.iter().map(chapter_to_text).collect::<Vec<_>>().join(CHAPTER_SEPARATOR);

    if !config.include_header {
        return body;
    }

    let mut output = generate_header(novel);
    output.push_str(CHAPTER_SEPARATOR);
    output.push_str(&body);
    output
}

/// Render one chapter's elements in order.
pub fn chapter_to_text(chapter: &Chapter) -> String {
    let mut output = String::new();
    for element in chapter.contents() {
        match element {
            ContentElement::Text { content } => output.push_str(content),
            ContentElement::LineBreak => output.push('\n'),
            ContentElement::Image { url } => output.push_str(&format!("<此处为插图 {}>", url)),
            ContentElement::Link { url, .. } => output.push_str(url),
        }
    }
    output
}

fn generate_header(novel: &Novel) -> String {
    let mut header = novel.title_or_default().to_string();
    if let Some(author) = &novel.author {
        header.push_str(&format!("\n作者：{}", author));
    }
    header
}
